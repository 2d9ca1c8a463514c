// src/config/mod.rs

//! Environment-driven configuration, loaded once at startup.

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SolaceConfig {
    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── Completion Backend (OpenAI-compatible chat completions)
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_timeout: u64,

    // ── Voice Backend (OpenAI-compatible audio/speech)
    pub tts_base_url: String,
    pub tts_api_key: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub tts_timeout: u64,

    // ── Audio Artifacts
    pub audio_dir: String,

    // ── Logging Configuration
    pub log_level: String,
}

/// Read an environment variable, tolerating trailing comments and whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl SolaceConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        let _ = dotenvy::dotenv();

        Self {
            host: env_var_or("SOLACE_HOST", "0.0.0.0".to_string()),
            port: env_var_or("SOLACE_PORT", 8000),
            llm_base_url: env_var_or(
                "SOLACE_LLM_BASE_URL",
                "http://localhost:11434/v1".to_string(),
            ),
            llm_api_key: env_var_or("SOLACE_LLM_API_KEY", "ollama".to_string()),
            llm_model: env_var_or("SOLACE_LLM_MODEL", "llama3".to_string()),
            llm_timeout: env_var_or("SOLACE_LLM_TIMEOUT", 60),
            tts_base_url: env_var_or(
                "SOLACE_TTS_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            tts_api_key: env_var_or("SOLACE_TTS_API_KEY", String::new()),
            tts_model: env_var_or("SOLACE_TTS_MODEL", "tts-1".to_string()),
            tts_voice: env_var_or("SOLACE_TTS_VOICE", "shimmer".to_string()),
            tts_timeout: env_var_or("SOLACE_TTS_TIMEOUT", 60),
            audio_dir: env_var_or("SOLACE_AUDIO_DIR", "./audio/generated".to_string()),
            log_level: env_var_or("SOLACE_LOG_LEVEL", "info".to_string()),
        }
    }

    // --- Convenience Methods ---

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory audio artifacts are written to and served from
    pub fn audio_path(&self) -> PathBuf {
        PathBuf::from(&self.audio_dir)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<SolaceConfig> = Lazy::new(SolaceConfig::from_env);
