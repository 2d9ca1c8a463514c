// src/api/http/mod.rs

//! Status and audio retrieval handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::AppState;

/// Health check
pub async fn status_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "solace" }))
}

/// Resolve an audio reference produced by the synthesizer to raw bytes.
pub async fn audio_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    // Artifact names are flat UUIDs; anything path-like is rejected.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let path = state.synthesizer.output_dir().join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
