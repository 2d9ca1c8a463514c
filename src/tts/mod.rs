// src/tts/mod.rs

//! Speech synthesis: a pluggable voice backend plus artifact storage.
//!
//! The synthesizer is purely functional given the text: no session state is
//! touched, and the returned file name is resolvable through the audio
//! retrieval endpoint.

mod openai;

pub use openai::OpenAiSpeechBackend;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::SynthesisError;

/// Pluggable voice backend: text in, encoded audio bytes out.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn render(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Renders replies to audio artifacts on disk.
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    output_dir: PathBuf,
}

impl SpeechSynthesizer {
    pub fn new(backend: Arc<dyn SpeechBackend>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `text` and persist the result under a fresh UUID file name.
    /// Returns the file name; fails on backend or storage error.
    pub async fn synthesize(&self, text: &str) -> Result<String, SynthesisError> {
        let bytes = self.backend.render(text).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let file_name = format!("{}.mp3", Uuid::new_v4());
        tokio::fs::write(self.output_dir.join(&file_name), &bytes).await?;

        debug!(
            "synthesized {} bytes via {} -> {}",
            bytes.len(),
            self.backend.name(),
            file_name
        );

        Ok(file_name)
    }
}
