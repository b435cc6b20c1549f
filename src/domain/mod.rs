//! Domain types for the voxnote pipeline.
//!
//! This module contains the core data structures:
//! - Candidate: a discovered audio file eligible for processing
//! - Transcript / Summary: intermediate products of one pipeline run
//! - QueueItem: a candidate wrapped with its processing state

pub mod candidate;
pub mod queue_item;
pub mod summary;

// Re-export commonly used types
pub use candidate::Candidate;
pub use queue_item::{ItemState, QueueItem};
pub use summary::{Summary, Transcript};
