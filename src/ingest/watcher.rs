//! Watch-folder discovery.
//!
//! Two discovery paths converge on the same queue entry point: a startup
//! scan that enumerates everything already in the watch folder, and a
//! debounced live watch that reacts to files appearing while running.

use std::path::PathBuf;
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::Candidate;

use super::filter::is_candidate;
use super::queue::QueueHandle;

/// Errors that can occur with the watcher
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("Watch directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory watcher feeding the ingestion queue
pub struct DirectoryWatcher {
    watch_dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryWatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            watch_dir: config.watch_dir.clone(),
            extensions: config.extensions.clone(),
        }
    }

    /// Check that the watch directory exists
    pub fn validate(&self) -> Result<(), WatcherError> {
        if !self.watch_dir.exists() {
            return Err(WatcherError::DirectoryNotFound(self.watch_dir.clone()));
        }
        Ok(())
    }

    /// Enumerate the watch directory once and enqueue every eligible file.
    /// Returns the number of candidates queued.
    pub async fn scan_once(&self, queue: &QueueHandle) -> Result<usize, WatcherError> {
        self.validate()?;

        let mut queued = 0;
        let mut entries = tokio::fs::read_dir(&self.watch_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(_) => continue,
            };

            if !is_candidate(&path, metadata.is_file(), &self.watch_dir, &self.extensions) {
                continue;
            }

            match Candidate::from_path(&path).await {
                Ok(candidate) => {
                    if queue.enqueue(candidate) {
                        queued += 1;
                    }
                }
                Err(e) => {
                    warn!("Failed to capture candidate {}: {}", path.display(), e);
                }
            }
        }

        Ok(queued)
    }

    /// Watch the directory and enqueue eligible files as they appear.
    /// Runs until stopped via the returned handle.
    pub fn watch(&self, queue: QueueHandle) -> Result<WatchHandle, WatcherError> {
        self.validate()?;

        let (stop_tx, stop_rx) = mpsc::channel::<()>(1);
        let watch_dir = self.watch_dir.clone();
        let extensions = self.extensions.clone();

        let task = tokio::spawn(async move {
            if let Err(e) = run_watcher(watch_dir, extensions, queue, stop_rx).await {
                tracing::error!("Watcher error: {}", e);
            }
        });

        Ok(WatchHandle { stop_tx, task })
    }
}

/// Handle to control the watcher
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl WatchHandle {
    /// Stop the watcher
    pub async fn stop(self) {
        let _ = self.stop_tx.send(()).await;
        let _ = self.task.await;
    }
}

/// Internal watcher loop
async fn run_watcher(
    watch_dir: PathBuf,
    extensions: Vec<String>,
    queue: QueueHandle,
    mut stop_rx: mpsc::Receiver<()>,
) -> Result<(), WatcherError> {
    // Debounce bursts of events while a recording is still being written
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_secs(2), tx)?;
    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)?;

    info!("Watching {} for recordings", watch_dir.display());

    loop {
        // Check for stop signal
        if stop_rx.try_recv().is_ok() {
            info!("Watcher stopping");
            break;
        }

        // Check for file events (non-blocking with timeout)
        match rx.recv_timeout(Duration::from_millis(500)) {
            Ok(Ok(events)) => {
                for event in events {
                    let path = event.path;
                    let is_file = tokio::fs::metadata(&path)
                        .await
                        .map(|m| m.is_file())
                        .unwrap_or(false);

                    if !is_candidate(&path, is_file, &watch_dir, &extensions) {
                        continue;
                    }

                    match Candidate::from_path(&path).await {
                        Ok(candidate) => {
                            info!(file = %path.display(), "discovered recording");
                            if !queue.enqueue(candidate) {
                                info!("Queue closed; watcher exiting");
                                return Ok(());
                            }
                        }
                        Err(e) => {
                            warn!("Failed to capture candidate {}: {}", path.display(), e);
                        }
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("Watcher error: {:?}", e);
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Expected - loop back around to the stop check
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("Watcher channel disconnected");
                break;
            }
        }
    }

    Ok(())
}
