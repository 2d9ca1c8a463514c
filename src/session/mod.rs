// src/session/mod.rs

//! Session registry: user id → live channel binding + response generator.
//!
//! Lazily-created, reconnect-surviving per-user state. At most one channel
//! binding is considered live per user id; a new connection replaces the
//! prior binding (last-connection-wins). Generators are never dropped, so
//! conversation memory survives reconnects for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use crate::api::ws::message::WsServerMessage;
use crate::chat::ResponseGenerator;
use crate::llm::CompletionBackend;

/// Outbound half of one live WebSocket connection. The id distinguishes
/// this binding from any binding that later replaces it.
#[derive(Clone)]
pub struct ChannelBinding {
    id: Uuid,
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelBinding {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Serialize and queue an outbound frame. Sending after the connection
    /// is gone is a no-op, not an error.
    pub fn send(&self, frame: &WsServerMessage) -> anyhow::Result<()> {
        let text = serde_json::to_string(frame)?;
        if self.tx.send(Message::Text(text.into())).is_err() {
            debug!("channel {} closed before send; dropping outbound frame", self.id);
        }
        Ok(())
    }
}

struct SessionEntry {
    generator: Arc<Mutex<ResponseGenerator>>,
    channel: Option<ChannelBinding>,
}

/// In-memory user → session table, owned by `AppState` and handed to the
/// orchestrator at construction. Mutated only on connect/disconnect, never
/// inside a message sequence. Entries are not evicted.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    backend: Arc<dyn CompletionBackend>,
    model: String,
}

impl SessionRegistry {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            backend,
            model: model.into(),
        }
    }

    /// Bind a new connection. Creates a fresh generator on first connect;
    /// reuses the existing one on reconnect. The stored channel binding is
    /// replaced either way.
    pub async fn connect(
        &self,
        user_id: &str,
        binding: ChannelBinding,
    ) -> Arc<Mutex<ResponseGenerator>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(user_id.to_string()).or_insert_with(|| SessionEntry {
            generator: Arc::new(Mutex::new(ResponseGenerator::new(
                self.backend.clone(),
                self.model.clone(),
            ))),
            channel: None,
        });
        entry.channel = Some(binding);
        entry.generator.clone()
    }

    /// Clear the stored binding, but only if it is the one disconnecting.
    /// A stale disconnect from a superseded connection leaves the newer
    /// binding alone. The generator always survives.
    pub async fn disconnect(&self, user_id: &str, channel_id: Uuid) {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(user_id) {
            if entry.channel.as_ref().is_some_and(|c| c.id() == channel_id) {
                entry.channel = None;
                debug!("cleared channel {} for {}", channel_id, user_id);
            }
        }
    }

    /// Current binding for a user, if any connection is live.
    pub async fn channel(&self, user_id: &str) -> Option<ChannelBinding> {
        self.sessions
            .read()
            .await
            .get(user_id)
            .and_then(|entry| entry.channel.clone())
    }

    /// Number of sessions ever created this process lifetime.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
