//! OpenAI-compatible chat-completions client.
//!
//! Implements `ModelInvoker` against any endpoint speaking the
//! `/chat/completions` protocol. The defaults target Gemini's
//! compatibility endpoint.

mod api;
mod client;
mod config;

pub use client::OpenAiCompatClient;
pub use config::OpenAiCompatConfig;
