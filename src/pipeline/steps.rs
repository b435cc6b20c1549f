//! Transcription and summarization steps.
//!
//! Thin adapters around the remote capabilities: each takes typed input,
//! returns typed output, and maps any provider failure into a single
//! stage-tagged `ProcessingError`. Neither step retries; a failure here
//! terminates the current file's processing.

use std::sync::Arc;

use crate::adapters::{TextGenerator, Transcriber};
use crate::domain::{Summary, Transcript};

use super::ProcessingError;

/// Headlines longer than this are clamped
const HEADLINE_MAX_CHARS: usize = 300;

/// Media type tag for an audio extension
pub fn media_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Adapter around the remote speech-to-text capability
pub struct TranscriptionStep {
    transcriber: Arc<dyn Transcriber>,
}

impl TranscriptionStep {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }

    /// Submit audio bytes and return the transcript. Fails when the remote
    /// call errors or returns empty text.
    pub async fn transcribe(
        &self,
        audio: &[u8],
        extension: &str,
        file_name: &str,
    ) -> Result<Transcript, ProcessingError> {
        let media_type = media_type_for(extension);

        let text = self
            .transcriber
            .transcribe(audio, media_type, file_name)
            .await
            .map_err(|e| ProcessingError::Transcription(e.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ProcessingError::Transcription(
                "provider returned no text".to_string(),
            ));
        }

        Ok(Transcript {
            text: text.to_string(),
        })
    }
}

/// Adapter around the remote text-generation capability
pub struct SummarizationStep {
    generator: Arc<dyn TextGenerator>,
}

impl SummarizationStep {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Summarize a transcript. The response contract is fixed: first line
    /// becomes the headline, the trimmed remainder becomes the body.
    pub async fn summarize(&self, transcript: &Transcript) -> Result<Summary, ProcessingError> {
        let prompt = build_prompt(&transcript.text);

        let response = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| ProcessingError::Summarization(e.to_string()))?;

        let response = response.trim();
        if response.is_empty() {
            return Err(ProcessingError::Summarization(
                "provider returned no content".to_string(),
            ));
        }

        Ok(split_response(response))
    }
}

/// Prompt wording is policy, not contract; the contract is "first line =
/// headline, remainder = body" and "language mirrors the transcript".
fn build_prompt(transcript: &str) -> String {
    format!(
        "Summarize the following voice memo transcript. Write in the first \
         person and in the same language as the transcript. Put a short \
         headline on the first line, then elaborate the key points as a \
         bulleted list, one point per line.\n\n{}",
        transcript
    )
}

/// Split the model response into headline and body at the first line break
fn split_response(response: &str) -> Summary {
    let mut parts = response.splitn(2, '\n');
    let headline: String = parts
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(HEADLINE_MAX_CHARS)
        .collect();
    let body = parts.next().unwrap_or_default().trim().to_string();

    Summary { headline, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_for_known_extensions() {
        assert_eq!(media_type_for("mp3"), "audio/mpeg");
        assert_eq!(media_type_for("M4A"), "audio/mp4");
        assert_eq!(media_type_for("ogg"), "application/octet-stream");
    }

    #[test]
    fn test_split_response_headline_and_body() {
        let summary = split_response("Quick note\n- said hello\n- waved");
        assert_eq!(summary.headline, "Quick note");
        assert_eq!(summary.body, "- said hello\n- waved");
    }

    #[test]
    fn test_split_response_single_line() {
        let summary = split_response("Just a headline");
        assert_eq!(summary.headline, "Just a headline");
        assert_eq!(summary.body, "");
    }

    #[test]
    fn test_split_response_trims_body() {
        let summary = split_response("Headline\n\n- point\n");
        assert_eq!(summary.headline, "Headline");
        assert_eq!(summary.body, "- point");
    }

    #[test]
    fn test_split_response_clamps_headline() {
        let long = "x".repeat(500);
        let summary = split_response(&format!("{}\n- body", long));
        assert_eq!(summary.headline.chars().count(), 300);
    }
}
