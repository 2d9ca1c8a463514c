// src/llm/openai.rs

//! OpenAI-compatible Chat Completions backend (non-streaming).
//!
//! Works against hosted APIs and local runtimes that expose
//! `/v1/chat/completions` (Ollama, vLLM, llama.cpp server).

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{CompletionBackend, CompletionRequest};
use crate::error::GenerationError;

pub struct OpenAiCompletionBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenAiCompletionBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build the wire message list: system, prior turns, current input.
    fn build_messages(request: &CompletionRequest) -> Vec<ChatCompletionMessage> {
        let mut messages = Vec::with_capacity(request.turns.len() + 2);

        messages.push(ChatCompletionMessage {
            role: "system".into(),
            content: request.system.clone(),
        });

        for turn in &request.turns {
            messages.push(ChatCompletionMessage {
                role: turn.role.as_str().into(),
                content: turn.content.clone(),
            });
        }

        messages.push(ChatCompletionMessage {
            role: "user".into(),
            content: request.input.clone(),
        });

        messages
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompletionBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: Self::build_messages(&request),
            stream: false,
        };

        debug!("requesting completion from {} ({})", url, request.model);

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
            return Err(GenerationError::Api(format!("{}: {}", status, text)));
        }

        let result: ChatCompletionResponse = response.json().await?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "openai-compat"
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
