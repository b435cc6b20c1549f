//! A discovered audio file eligible for processing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// A discovered audio file. Immutable once captured; the raw bytes are read
/// lazily by the pipeline through the storage boundary.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Path to the audio file inside the watch folder
    pub path: PathBuf,

    /// Lowercased file extension (without the dot)
    pub extension: String,

    /// Last-modified timestamp of the recording
    pub modified_at: DateTime<Local>,
}

impl Candidate {
    /// Create a candidate from already-known parts
    pub fn new(path: PathBuf, extension: String, modified_at: DateTime<Local>) -> Self {
        Self {
            path,
            extension,
            modified_at,
        }
    }

    /// Capture a candidate from a path, reading its modification time
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let modified_at: DateTime<Local> = metadata.modified()?.into();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        Ok(Self {
            path: path.to_path_buf(),
            extension,
            modified_at,
        })
    }

    /// File name of the source recording
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use filetime::FileTime;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_path_captures_extension_and_mtime() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Memo.M4A");
        tokio::fs::write(&path, b"audio").await.unwrap();

        let mtime = Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(mtime.timestamp(), 0)).unwrap();

        let candidate = Candidate::from_path(&path).await.unwrap();
        assert_eq!(candidate.extension, "m4a");
        assert_eq!(candidate.modified_at, mtime);
        assert_eq!(candidate.file_name(), "Memo.M4A");
    }
}
