pub mod provider;

pub use provider::{ChatMessage, ChatRequest, ChatResponse, Provider};
