//! Configuration schema types for Parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod agent;
mod chat;
mod model;

pub use agent::*;
pub use chat::*;
pub use model::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Parley.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub model: ModelConfig,
    pub agent: AgentConfig,
    pub chat: ChatConfig,
}
