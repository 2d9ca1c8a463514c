// src/state.rs

//! Process-wide service wiring. The registry and synthesizer are owned
//! here and handed to handlers through axum state, never through globals.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SolaceConfig;
use crate::llm::{CompletionBackend, OpenAiCompletionBackend};
use crate::session::SessionRegistry;
use crate::tts::{OpenAiSpeechBackend, SpeechBackend, SpeechSynthesizer};

pub struct AppState {
    pub registry: SessionRegistry,
    pub synthesizer: SpeechSynthesizer,
}

impl AppState {
    /// Production wiring from config.
    pub fn from_config(config: &SolaceConfig) -> anyhow::Result<Self> {
        let completion = Arc::new(OpenAiCompletionBackend::new(
            &config.llm_base_url,
            &config.llm_api_key,
            Duration::from_secs(config.llm_timeout),
        )?);
        let speech = Arc::new(OpenAiSpeechBackend::new(
            &config.tts_base_url,
            &config.tts_api_key,
            &config.tts_model,
            &config.tts_voice,
            Duration::from_secs(config.tts_timeout),
        )?);

        Ok(Self::with_backends(
            completion,
            &config.llm_model,
            speech,
            config.audio_path(),
        ))
    }

    /// Explicit wiring; lets tests swap in deterministic backends.
    pub fn with_backends(
        completion: Arc<dyn CompletionBackend>,
        model: &str,
        speech: Arc<dyn SpeechBackend>,
        audio_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(completion, model),
            synthesizer: SpeechSynthesizer::new(speech, audio_dir),
        }
    }
}
