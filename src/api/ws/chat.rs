// src/api/ws/chat.rs

//! Connection loop and the per-message pipeline.
//!
//! Each inbound utterance runs classify → generate → synthesize → send to
//! completion before the next frame on the same channel is read. Generation
//! and synthesis failures degrade the outbound message; only unanticipated
//! faults close the connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

use crate::api::ws::message::{WsClientMessage, WsServerMessage};
use crate::chat::ResponseGenerator;
use crate::error::ProtocolError;
use crate::session::ChannelBinding;
use crate::state::AppState;

/// Reply sent when the completion backend is unavailable.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble finding my words right now. Give me a moment, then tell me that again?";

/// WebSocket handler entry point
pub async fn ws_chat_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let (mut sender, mut receiver) = socket.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
    let raw_tx = outbound_tx.clone();
    let binding = ChannelBinding::new(outbound_tx);
    let channel_id = binding.id();

    let generator = state.registry.connect(&user_id, binding.clone()).await;
    info!("🔌 {} connected (channel {})", user_id, channel_id);

    // Single writer task: outbound frames drain through here, so a send
    // after the socket is gone just ends the drain.
    let forward = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
        let _ = sender.close().await;
    });

    while let Some(received) = receiver.next().await {
        let msg = match received {
            Ok(msg) => msg,
            Err(e) => {
                error!("websocket receive error for {}: {}", user_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                // Strict FIFO per channel: the sequence runs to completion
                // before the next frame is read.
                if let Err(e) =
                    run_message_sequence(text.as_str(), &state, &generator, &binding).await
                {
                    error!("unexpected fault in message sequence for {}: {:#}", user_id, e);
                    break;
                }
            }
            Message::Binary(_) => {
                debug!("ignoring binary frame from {}", user_id);
            }
            Message::Ping(data) => {
                let _ = raw_tx.send(Message::Pong(data));
            }
            Message::Pong(_) => {}
            Message::Close(_) => {
                info!("close frame from {}", user_id);
                break;
            }
        }
    }

    state.registry.disconnect(&user_id, channel_id).await;
    info!("🔌 {} disconnected (channel {})", user_id, channel_id);

    // Drop our senders so the writer task drains and exits.
    drop(binding);
    drop(raw_tx);
    let _ = forward.await;
}

/// Drive one inbound frame through the pipeline and emit the outbound
/// message. Returns `Err` only for unanticipated faults; the caller closes
/// the connection on those.
pub async fn run_message_sequence(
    raw: &str,
    state: &AppState,
    generator: &Arc<Mutex<ResponseGenerator>>,
    binding: &ChannelBinding,
) -> anyhow::Result<()> {
    let frame = match serde_json::from_str::<WsClientMessage>(raw) {
        Ok(frame) => frame,
        Err(e) => {
            // Sequence aborts; the connection stays open.
            warn!("{}", ProtocolError::Malformed(e));
            return Ok(());
        }
    };

    let WsClientMessage::UserMessage { text: utterance } = frame;

    let emotion = crate::emotion::classify(&utterance);
    debug!("utterance tagged {}", emotion);

    let (text, audio_url) = match generator.lock().await.generate(&utterance, emotion).await {
        Ok(reply) => match state.synthesizer.synthesize(&reply).await {
            Ok(file_name) => {
                let url = format!("/audio/{}", file_name);
                (reply, Some(url))
            }
            Err(e) => {
                // Keep the reply; audio is best-effort.
                warn!("synthesis failed, sending text-only reply: {}", e);
                (reply, None)
            }
        },
        Err(e) => {
            // Fallback reply, and synthesis is skipped entirely.
            warn!("generation failed, sending fallback reply: {}", e);
            (FALLBACK_REPLY.to_string(), None)
        }
    };

    binding.send(&WsServerMessage::AssistantResponse {
        text,
        audio_url,
        timestamp: Utc::now().to_rfc3339(),
    })
}
