//! API credential resolution.

use std::fmt;

use parley_common::ConfigError;

use crate::schema::ModelConfig;

/// The resolved API credential. Never printed.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the variable named by `model.api_key_env`.
    pub fn from_env(model: &ModelConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(model, |name| std::env::var(name).ok())
    }

    /// Resolve through an arbitrary lookup. Absent and blank values are
    /// both treated as missing.
    pub fn from_lookup(
        model: &ModelConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        match lookup(&model.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(ConfigError::MissingCredential(model.api_key_env.clone())),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
