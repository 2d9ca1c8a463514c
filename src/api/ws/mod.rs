// src/api/ws/mod.rs

//! WebSocket chat endpoint: connection lifecycle and the per-message
//! pipeline.

pub mod chat;
pub mod message;

pub use chat::ws_chat_handler;
