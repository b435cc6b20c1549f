//! Remote capability interfaces.
//!
//! The pipeline depends on two opaque remote capabilities: speech-to-text
//! and text generation. Both are expressed as traits so tests can substitute
//! local doubles for the hosted services.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

pub use openai::OpenAiClient;

/// Remote speech-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Submit audio bytes tagged with their media type and return the
    /// transcribed text. An error here is terminal for the current attempt.
    async fn transcribe(&self, audio: &[u8], media_type: &str, file_name: &str) -> Result<String>;
}

/// Remote text-generation capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String>;
}
