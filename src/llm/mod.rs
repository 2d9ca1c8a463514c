// src/llm/mod.rs

//! Completion backend abstraction.
//!
//! One capability, one method: turn an assembled prompt into a reply.
//! Production talks to an OpenAI-compatible Chat Completions endpoint;
//! deterministic doubles live with the tests.

mod openai;

pub use openai::OpenAiCompletionBackend;

use async_trait::async_trait;

use crate::chat::ChatTurn;
use crate::error::GenerationError;

/// Fully assembled prompt for one completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    /// Prior conversation turns, already windowed by the generator.
    pub turns: Vec<ChatTurn>,
    /// Current utterance, annotated with its emotion label.
    pub input: String,
}

/// Pluggable text-generation backend
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produce a reply for the assembled prompt. Suspends for the duration
    /// of the backend call; never blocks other sessions.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
