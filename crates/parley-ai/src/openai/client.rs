//! Client struct, request building, and response parsing.

use serde_json::Value;

use crate::{InvocationError, Role, TokenUsage, Turn};

use super::config::OpenAiCompatConfig;

/// Sentinel `data:` payload that closes a completions stream.
pub(crate) const STREAM_DONE: &str = "[DONE]";

/// OpenAI-compatible chat-completions client.
pub struct OpenAiCompatClient {
    pub(crate) config: OpenAiCompatConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, InvocationError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| InvocationError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Build the JSON request body for `/chat/completions`.
    pub(crate) fn build_request_body(&self, transcript: &[Turn], stream: bool) -> Value {
        let mut messages = Vec::with_capacity(transcript.len() + 1);

        if let Some(ref instructions) = self.config.instructions {
            messages.push(serde_json::json!({
                "role": "system",
                "content": instructions,
            }));
        }

        for turn in transcript {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Tool => "tool",
            };
            messages.push(serde_json::json!({
                "role": role,
                "content": turn.content,
            }));
        }

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
        });

        if let Some(temperature) = self.config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if stream {
            body["stream"] = serde_json::json!(true);
        }

        body
    }
}

/// Parse a non-streaming completion into its text and usage.
pub(crate) fn parse_response(json: &Value) -> Result<(String, TokenUsage), InvocationError> {
    let choice = json["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| InvocationError::Parse("no choices in response".to_string()))?;

    let content = match &choice["message"]["content"] {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => {
            return Err(InvocationError::Parse(format!(
                "unexpected message content: {other}"
            )))
        }
    };

    let usage = TokenUsage {
        input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
        output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
    };

    Ok((content, usage))
}

/// Extract the text delta from one streamed chunk. Chunks with no text
/// (role announcements, finish markers) yield `None`.
pub(crate) fn parse_stream_chunk(data: &str) -> Result<Option<String>, InvocationError> {
    let json: Value = serde_json::from_str(data)
        .map_err(|e| InvocationError::Parse(format!("bad stream chunk: {e}")))?;

    if let Some(message) = json["error"]["message"].as_str() {
        return Err(InvocationError::Api(message.to_string()));
    }

    let delta = json["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .and_then(|choice| choice["delta"]["content"].as_str())
        .filter(|text| !text.is_empty())
        .map(String::from);

    Ok(delta)
}

/// Map a non-success HTTP status and body to an invocation error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> InvocationError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return InvocationError::RateLimited;
    }
    let body = body.chars().take(200).collect::<String>();
    InvocationError::Api(format!("HTTP {status}: {body}"))
}

pub(crate) fn transport_error(e: reqwest::Error) -> InvocationError {
    if e.is_timeout() {
        InvocationError::Timeout
    } else {
        InvocationError::Network(e.to_string())
    }
}
