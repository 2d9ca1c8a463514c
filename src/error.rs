// src/error.rs

//! Failure domains for the message pipeline.
//!
//! Generation and synthesis failures are caught at their call sites and
//! degrade the outbound message; they never close the connection. Protocol
//! errors abort a single sequence and leave the connection open.

use thiserror::Error;

/// Completion backend failures
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned no completion")]
    EmptyCompletion,
}

/// Voice backend and artifact storage failures
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("voice API error: {0}")]
    Backend(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Malformed inbound frames
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}
