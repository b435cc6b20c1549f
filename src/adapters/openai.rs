//! OpenAI-compatible client for both remote capabilities.
//!
//! Speech-to-text goes through the multipart `/audio/transcriptions`
//! endpoint; summarization prompts go through `/chat/completions`. The base
//! URL is overridable so tests can point the client at a local double.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use super::{TextGenerator, Transcriber};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";

/// Transport-level request timeout. The pipeline itself enforces no timeout;
/// this only keeps a dead connection from holding the worker forever.
const REQUEST_TIMEOUT_SECS: u64 = 600;

/// Client for the OpenAI HTTP API
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    transcription_model: String,
    generation_model: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client with default models and endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            client,
        })
    }

    /// Override the API base URL (for proxies and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the transcription model
    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// Override the generation model
    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, audio: &[u8], media_type: &str, file_name: &str) -> Result<String> {
        let part = Part::bytes(audio.to_vec())
            .file_name(file_name.to_string())
            .mime_str(media_type)
            .with_context(|| format!("Invalid media type: {}", media_type))?;

        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Transcription API returned {}: {}", status, body.trim());
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        Ok(payload.text)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.generation_model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Text generation request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Generation API returned {}: {}", status, body.trim());
        }

        let payload: ChatResponse = response
            .json()
            .await
            .context("Failed to parse generation response")?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}
