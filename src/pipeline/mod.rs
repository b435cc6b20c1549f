//! The per-recording processing pipeline.
//!
//! `ProcessingPipeline::run` executes the ordered transform sequence for one
//! candidate: transcribe, summarize, render, write the note, relocate the
//! source recording. The note write is the commit point; once it succeeds
//! the candidate counts as processed, and a later relocation failure leaves
//! a reported (but not rolled back) partial state.

pub mod naming;
pub mod renderer;
pub mod steps;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{TextGenerator, Transcriber};
use crate::config::Config;
use crate::domain::Candidate;
use crate::storage::{Storage, StorageError};

pub use steps::{SummarizationStep, TranscriptionStep};

/// Terminal failure of one candidate's processing attempt. Failures never
/// affect other queued candidates.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("storage failed: {0}")]
    Storage(String),
}

impl ProcessingError {
    /// The pipeline stage this failure belongs to
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Transcription(_) => "transcription",
            Self::Summarization(_) => "summarization",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<StorageError> for ProcessingError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Outcome of a successful pipeline run
#[derive(Debug, Clone)]
pub struct ProcessedNote {
    /// Where the note was written
    pub note_path: PathBuf,

    /// Where the source recording was archived
    pub archived_path: PathBuf,
}

/// Orchestrates the transform sequence and the final storage effects for
/// one candidate at a time.
pub struct ProcessingPipeline {
    transcription: TranscriptionStep,
    summarization: SummarizationStep,
    storage: Arc<dyn Storage>,
    output_dir: PathBuf,
    processed_dir: PathBuf,
    append_transcript: bool,
}

impl ProcessingPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn TextGenerator>,
        storage: Arc<dyn Storage>,
        config: &Config,
    ) -> Self {
        Self {
            transcription: TranscriptionStep::new(transcriber),
            summarization: SummarizationStep::new(generator),
            storage,
            output_dir: config.output_dir.clone(),
            processed_dir: config.processed_dir.clone(),
            append_transcript: config.append_transcript,
        }
    }

    /// Process one candidate end to end. Steps are strictly sequential and
    /// each depends on the prior one succeeding.
    #[instrument(skip(self, candidate), fields(file = %candidate.file_name()))]
    pub async fn run(&self, candidate: &Candidate) -> Result<ProcessedNote, ProcessingError> {
        let base = naming::base_name(&candidate.modified_at);
        let audio_name = if candidate.extension.is_empty() {
            base.clone()
        } else {
            format!("{}.{}", base, candidate.extension)
        };

        let audio = self.storage.read_bytes(&candidate.path).await?;
        debug!(bytes = audio.len(), "read candidate audio");

        let transcript = self
            .transcription
            .transcribe(&audio, &candidate.extension, &audio_name)
            .await?;
        debug!(chars = transcript.text.len(), "transcription complete");

        let summary = self.summarization.summarize(&transcript).await?;
        debug!(headline = %summary.headline, "summarization complete");

        let note_text = renderer::render(
            &summary,
            &transcript,
            &audio_name,
            &candidate.modified_at,
            self.append_transcript,
        );

        // Commit point: once the note is written, the candidate counts as
        // processed and is no longer eligible for rediscovery.
        self.storage.create_dir(&self.output_dir).await?;
        let note_path = self
            .resolve_unique(self.output_dir.join(format!("{}.md", base)))
            .await;
        self.storage.write_file(&note_path, &note_text).await?;
        info!(note = %note_path.display(), "note written");

        match self.relocate(candidate, &audio_name).await {
            Ok(archived_path) => {
                info!(archived = %archived_path.display(), "source archived");
                Ok(ProcessedNote {
                    note_path,
                    archived_path,
                })
            }
            Err(e) => {
                // Post-commit partial state: note exists, source still in
                // the watch folder. Reported, not rolled back.
                warn!(
                    note = %note_path.display(),
                    source = %candidate.path.display(),
                    "note written but source was not relocated"
                );
                Err(e)
            }
        }
    }

    /// Move the source recording into the processed directory
    async fn relocate(
        &self,
        candidate: &Candidate,
        audio_name: &str,
    ) -> Result<PathBuf, ProcessingError> {
        self.storage.create_dir(&self.processed_dir).await?;

        let archive_path = self
            .resolve_unique(self.processed_dir.join(audio_name))
            .await;
        self.storage.rename(&candidate.path, &archive_path).await?;

        Ok(archive_path)
    }

    /// Resolve a collision-free target path via the storage boundary
    async fn resolve_unique(&self, desired: PathBuf) -> PathBuf {
        let occupied = self.storage.path_exists(&desired).await;
        naming::resolve_unique_path(&desired, |_| occupied)
    }
}
