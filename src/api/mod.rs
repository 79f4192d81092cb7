pub mod client;
pub mod models;

pub use client::{ChatClient, ChatService};
pub use models::{ChatRequest, ChatResponse};

/// Bot message shown whenever the chat endpoint cannot be reached.
pub const FALLBACK_MESSAGE: &str =
    "⚠️ **Connection Error**: I couldn't reach the OneCard server. Is it running on port 8000?";
