//! Candidate discovery and admission.
//!
//! The ingestion side of the system:
//!
//! 1. **Filter**: pure predicate deciding which discovered files are
//!    processable candidates
//! 2. **Watcher**: startup scan plus notify-based live watch over the
//!    watch folder
//! 3. **Queue**: serialized admission point running the pipeline on one
//!    candidate at a time
//!
//! ```text
//! watch folder ──► scan / live events ──► filter ──► queue ──► pipeline
//! ```

pub mod filter;
pub mod queue;
pub mod watcher;

// Re-export key types
pub use filter::is_candidate;
pub use queue::{IngestionQueue, PipelineNotice, QueueHandle};
pub use watcher::{DirectoryWatcher, WatchHandle, WatcherError};
