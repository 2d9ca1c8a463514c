// src/main.rs

use std::sync::Arc;

use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use solace::api;
use solace::config::CONFIG;
use solace::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = CONFIG.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Solace backend");
    info!("Model: {}", CONFIG.llm_model);
    info!("Voice: {} ({})", CONFIG.tts_voice, CONFIG.tts_model);

    std::fs::create_dir_all(CONFIG.audio_path())?;

    let state = Arc::new(AppState::from_config(&CONFIG)?);
    let app = api::router(state);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("WebSocket server listening on ws://{}/ws/{{user_id}}", bind_address);
    info!("Audio artifacts served from {}", CONFIG.audio_dir);

    axum::serve(listener, app).await?;

    Ok(())
}
