//! voxnote - voice recording to note pipeline
//!
//! Watches a folder for newly appearing audio recordings, transcribes each
//! one through a remote speech-to-text service, summarizes the transcript
//! through a remote text-generation service, writes the result as a Markdown
//! note with front-matter, and relocates the source recording to an archive
//! folder.
//!
//! # Architecture
//!
//! ```text
//! watch folder ──► watcher/scan ──► IngestionQueue ──► ProcessingPipeline
//!                                                       │ transcribe
//!                                                       │ summarize
//!                                                       │ render note   (commit point)
//!                                                       └ relocate audio
//! ```
//!
//! A single worker task drains the queue, so at most one recording is being
//! transformed at any time. Failures are isolated per recording: a failed
//! item is reported and left in the watch folder for rediscovery, and the
//! queue moves on to the next item.
//!
//! # Modules
//!
//! - `adapters`: remote capability clients (speech-to-text, text generation)
//! - `ingest`: candidate discovery, filtering, and the serialized queue
//! - `pipeline`: the per-recording transform sequence and naming/rendering
//! - `storage`: the host file-storage boundary
//! - `domain`: data structures (Candidate, Transcript, Summary, QueueItem)
//! - `cli`: command-line interface

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod pipeline;
pub mod storage;

// Re-export main types at crate root for convenience
pub use adapters::{OpenAiClient, TextGenerator, Transcriber};
pub use config::Config;
pub use domain::{Candidate, ItemState, QueueItem, Summary, Transcript};
pub use ingest::{DirectoryWatcher, IngestionQueue, PipelineNotice, QueueHandle};
pub use pipeline::{ProcessedNote, ProcessingError, ProcessingPipeline};
pub use storage::{LocalStorage, Storage, StorageError};
