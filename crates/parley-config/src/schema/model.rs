//! Hosted model endpoint settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Which model to call, where, and with which credential variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    /// Environment variable holding the API key. The key itself never
    /// lives in the config file.
    pub api_key_env: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub connect_timeout_secs: u32,
    pub request_timeout_secs: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            temperature: None,
            max_tokens: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
