//! Configuration for voxnote.
//!
//! Sources (highest priority first):
//! 1. Environment variables (VOXNOTE_API_KEY / OPENAI_API_KEY,
//!    VOXNOTE_WATCH_DIR, VOXNOTE_PROCESSED_DIR, VOXNOTE_OUTPUT_DIR)
//! 2. Config file (YAML, `--config <path>` or ~/.voxnote/config.yaml)
//!
//! The resolved `Config` is an explicit value handed to the pipeline and
//! queue constructors at startup; there is no ambient global configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches the YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// API credential for the remote transcription/summarization provider
    pub api_key: Option<String>,

    /// Directory watched for new recordings
    pub watch_dir: Option<PathBuf>,

    /// Archive directory for processed recordings
    pub processed_dir: Option<PathBuf>,

    /// Directory notes are written to
    pub output_dir: Option<PathBuf>,

    /// Allow-listed audio extensions
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Whether the raw transcript is appended to each note
    pub append_transcript: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub watch_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub output_dir: PathBuf,
    pub extensions: Vec<String>,
    pub append_transcript: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["mp3".to_string(), "m4a".to_string()]
}

/// Derive a sibling directory name from the watch directory,
/// e.g. `voice-notes` -> `voice-notes-processed`
fn sibling_dir(watch_dir: &Path, suffix: &str) -> PathBuf {
    let name = watch_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "voice-notes".to_string());
    watch_dir.with_file_name(format!("{}-{}", name, suffix))
}

impl Config {
    /// Default config file location (~/.voxnote/config.yaml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".voxnote").join("config.yaml"))
    }

    /// Load and resolve configuration. `explicit` takes precedence over the
    /// default location; the default location is optional, an explicit path
    /// is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Self::resolve(file)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply env overrides and defaults on top of the file values
    fn resolve(file: ConfigFile) -> Result<Self> {
        let api_key = std::env::var("VOXNOTE_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .or(file.api_key)
            .context("No API key configured. Set api_key in the config file or VOXNOTE_API_KEY")?;

        let watch_dir = std::env::var("VOXNOTE_WATCH_DIR")
            .ok()
            .map(PathBuf::from)
            .or(file.watch_dir)
            .context("No watch directory configured. Set watch_dir in the config file or VOXNOTE_WATCH_DIR")?;

        let processed_dir = std::env::var("VOXNOTE_PROCESSED_DIR")
            .ok()
            .map(PathBuf::from)
            .or(file.processed_dir)
            .unwrap_or_else(|| sibling_dir(&watch_dir, "processed"));

        let output_dir = std::env::var("VOXNOTE_OUTPUT_DIR")
            .ok()
            .map(PathBuf::from)
            .or(file.output_dir)
            .unwrap_or_else(|| sibling_dir(&watch_dir, "output"));

        let extensions = file
            .extensions
            .filter(|e| !e.is_empty())
            .unwrap_or_else(default_extensions);

        Ok(Self {
            api_key,
            watch_dir,
            processed_dir,
            output_dir,
            extensions,
            append_transcript: file.append_transcript.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
api_key: sk-test
watch_dir: /data/voice-notes
extensions:
  - m4a
append_transcript: false
"#
        )
        .unwrap();

        let file = Config::read_file(&config_path).unwrap();
        assert_eq!(file.api_key.as_deref(), Some("sk-test"));
        assert_eq!(file.watch_dir, Some(PathBuf::from("/data/voice-notes")));
        assert_eq!(file.extensions, Some(vec!["m4a".to_string()]));
        assert_eq!(file.append_transcript, Some(false));
    }

    #[test]
    fn test_resolve_derives_sibling_dirs() {
        let file = ConfigFile {
            api_key: Some("sk-test".to_string()),
            watch_dir: Some(PathBuf::from("/data/voice-notes")),
            ..Default::default()
        };

        let config = Config::resolve(file).unwrap();
        assert_eq!(config.processed_dir, PathBuf::from("/data/voice-notes-processed"));
        assert_eq!(config.output_dir, PathBuf::from("/data/voice-notes-output"));
        assert_eq!(config.extensions, vec!["mp3", "m4a"]);
        assert!(config.append_transcript);
    }

    #[test]
    fn test_resolve_requires_api_key() {
        let file = ConfigFile {
            watch_dir: Some(PathBuf::from("/data/voice-notes")),
            ..Default::default()
        };

        // Only meaningful when the env overrides are absent
        if std::env::var("VOXNOTE_API_KEY").is_err() && std::env::var("OPENAI_API_KEY").is_err() {
            assert!(Config::resolve(file).is_err());
        }
    }

    #[test]
    fn test_explicit_dirs_win_over_derived() {
        let file = ConfigFile {
            api_key: Some("sk-test".to_string()),
            watch_dir: Some(PathBuf::from("/data/voice-notes")),
            processed_dir: Some(PathBuf::from("/archive")),
            output_dir: Some(PathBuf::from("/notes")),
            ..Default::default()
        };

        let config = Config::resolve(file).unwrap();
        assert_eq!(config.processed_dir, PathBuf::from("/archive"));
        assert_eq!(config.output_dir, PathBuf::from("/notes"));
    }
}
