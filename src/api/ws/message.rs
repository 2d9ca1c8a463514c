// src/api/ws/message.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum WsClientMessage {
    #[serde(rename = "user_message")]
    UserMessage { text: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    #[serde(rename = "assistant_response")]
    AssistantResponse {
        text: String,
        /// Absent (null on the wire) when synthesis failed or was skipped.
        audio_url: Option<String>,
        /// RFC 3339 timestamp of emission.
        timestamp: String,
    },
}
