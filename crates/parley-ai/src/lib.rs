//! Conversation engine for Parley.
//!
//! Provides:
//! - The `ModelInvoker` seam between a session and a hosted model
//! - An OpenAI-compatible chat-completions client (Gemini's default endpoint)
//! - Server-Sent Events decoding for streamed replies
//! - `Session`, the per-user conversation-history state machine
//! - Token usage tracking

pub mod openai;
pub mod session;
pub mod streaming;
pub mod token_tracker;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use openai::{OpenAiCompatClient, OpenAiCompatConfig};
pub use session::{EmptyTurn, Session, StreamedTurn, TurnOutcome, TurnState};
pub use token_tracker::TokenTracker;

/// A lazy, single-consumer sequence of reply fragments.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, InvocationError>> + Send>>;

/// The external call that sends a transcript to a hosted model.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Model identifier, used for usage accounting and logs.
    fn model_name(&self) -> &str;

    /// Run one complete request. The returned canonical transcript is the
    /// full history as the model side sees it after the reply.
    async fn invoke(&self, transcript: &[Turn]) -> Result<Invocation, InvocationError>;

    /// Open a streamed request. Fragments arrive in order and the stream
    /// ends exactly once.
    async fn invoke_streaming(&self, transcript: &[Turn]) -> Result<DeltaStream, InvocationError>;
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// `Tool` only shows up inside canonical transcripts handed back by an
/// invoker; sessions never create it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// Result of a successful synchronous invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub final_output: String,
    pub canonical_transcript: Vec<Turn>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Any failure from the model-invocation step. Sessions recover from all
/// of these by showing a diagnostic instead of a reply.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Turn::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn total_tokens_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 1,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }

    #[test]
    fn invocation_error_display() {
        assert_eq!(InvocationError::RateLimited.to_string(), "Rate limited");
        assert_eq!(
            InvocationError::Api("HTTP 401: bad key".into()).to_string(),
            "API error: HTTP 401: bad key"
        );
    }
}
