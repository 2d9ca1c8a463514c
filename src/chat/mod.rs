// src/chat/mod.rs

//! Per-session response generation: bounded conversation memory and
//! emotion-tagged prompt assembly.

mod generator;

pub use generator::{ChatTurn, MEMORY_CAP, PROMPT_WINDOW, ResponseGenerator, Role};
