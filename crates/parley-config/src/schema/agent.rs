//! Assistant persona settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a helpful assistant. Answer the user's questions to the best of your ability.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    /// System prompt sent ahead of every request. Not part of the transcript.
    pub instructions: String,
    pub greeting: Option<String>,
    /// Seed the greeting into the transcript as the first assistant turn.
    pub remember_greeting: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Assistant".into(),
            instructions: DEFAULT_INSTRUCTIONS.into(),
            greeting: Some("Welcome to Parley! How can I help you today?".into()),
            remember_greeting: true,
        }
    }
}
