//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod agent;
mod helpers;
mod model;

#[cfg(test)]
mod tests;

use crate::schema::ParleyConfig;
use parley_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    model::validate_model(&mut errors, config);
    agent::validate_agent(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
