use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Render replies token by token instead of all at once.
    pub stream: bool,
    /// Log each user/assistant exchange at info level.
    pub log_turns: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            stream: false,
            log_turns: true,
        }
    }
}
