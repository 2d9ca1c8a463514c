// src/api/mod.rs

//! HTTP and WebSocket surface.

pub mod http;
pub mod ws;

use std::sync::Arc;

use axum::http::{Method, header};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the router with all endpoints
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/status", get(http::status_handler))
        .route("/audio/{filename}", get(http::audio_handler))
        .route("/ws/{user_id}", get(ws::ws_chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
