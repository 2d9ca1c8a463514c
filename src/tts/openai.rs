// src/tts/openai.rs

//! OpenAI-compatible `/audio/speech` voice backend.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;
use std::time::Duration;

use super::SpeechBackend;
use crate::error::SynthesisError;

pub struct OpenAiSpeechBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl OpenAiSpeechBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
        })
    }
}

#[async_trait]
impl SpeechBackend for OpenAiSpeechBackend {
    async fn render(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}/audio/speech", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("(failed to read body: {})", e));
            return Err(SynthesisError::Backend(format!("{}: {}", status, text)));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "openai-speech"
    }
}
