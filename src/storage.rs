//! Host file-storage boundary.
//!
//! The pipeline performs every filesystem effect through this trait, so the
//! host's storage layer can be substituted in tests. `LocalStorage` is the
//! production implementation over `tokio::fs`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors from the storage boundary
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("path already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("{op} failed for {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The storage operations the pipeline needs from the host
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether a path currently exists
    async fn path_exists(&self, path: &Path) -> bool;

    /// Create a directory (and parents). Idempotent on an existing path.
    async fn create_dir(&self, path: &Path) -> Result<(), StorageError>;

    /// Read the full contents of a file
    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Write a new file. Fails when the path is already occupied; callers
    /// must pre-resolve uniqueness.
    async fn write_file(&self, path: &Path, text: &str) -> Result<(), StorageError>;

    /// Move a file to a new path
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError>;
}

/// Local filesystem storage
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn path_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir(&self, path: &Path) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| StorageError::io("create_dir", path, e))
    }

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io("read", path, e))
    }

    async fn write_file(&self, path: &Path, text: &str) -> Result<(), StorageError> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(path.to_path_buf())
                } else {
                    StorageError::io("write", path, e)
                }
            })?;

        file.write_all(text.as_bytes())
            .await
            .map_err(|e| StorageError::io("write", path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io("write", path, e))?;

        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        tokio::fs::rename(from, to)
            .await
            .map_err(|e| StorageError::io("rename", from, e))
    }
}
