// src/chat/generator.rs

use std::sync::Arc;
use tracing::debug;

use crate::emotion::EmotionLabel;
use crate::error::GenerationError;
use crate::llm::{CompletionBackend, CompletionRequest};
use crate::persona::COMPANION_PROMPT;

/// Hard cap on retained conversation turns per session (FIFO eviction).
pub const MEMORY_CAP: usize = 10;

/// Number of prior turns included in each prompt.
pub const PROMPT_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One remembered conversation turn. Emotion labels are never stored here.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Per-session reply producer. Owns its conversation memory exclusively;
/// never shared across sessions.
pub struct ResponseGenerator {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    system_prompt: String,
    history: Vec<ChatTurn>,
}

impl ResponseGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            system_prompt: COMPANION_PROMPT.to_string(),
            history: Vec::new(),
        }
    }

    /// Append a turn, then evict oldest turns past the cap.
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role,
            content: content.into(),
        });
        if self.history.len() > MEMORY_CAP {
            let excess = self.history.len() - MEMORY_CAP;
            self.history.drain(..excess);
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Most recent turns that go into the prompt, post-eviction.
    fn prompt_window(&self) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(PROMPT_WINDOW);
        &self.history[start..]
    }

    /// Produce a reply for `utterance`. Memory is only mutated once the
    /// backend call has resolved: user turn first, then assistant turn.
    /// On failure memory is left untouched.
    pub async fn generate(
        &mut self,
        utterance: &str,
        emotion: EmotionLabel,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            system: self.system_prompt.clone(),
            turns: self.prompt_window().to_vec(),
            input: format!("[Emotion: {}] {}", emotion, utterance),
        };

        debug!(
            "generating via {}: {} prior turns in window",
            self.backend.name(),
            request.turns.len()
        );

        let reply = self.backend.complete(request).await?;

        self.append_turn(Role::User, utterance);
        self.append_turn(Role::Assistant, reply.clone());

        Ok(reply)
    }
}
