//! Parley configuration system.
//!
//! TOML-based configuration with full validation, plus resolution of the
//! API credential from the environment. All config sections use sensible
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::{load_config, Credentials};
//!
//! let config = load_config(None).expect("failed to load config");
//! let creds = Credentials::from_env(&config.model).expect("missing API key");
//! ```

pub mod credentials;
pub mod dotenv;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::Credentials;
pub use dotenv::load_dotenv;
pub use schema::{AgentConfig, ChatConfig, ModelConfig, ParleyConfig};

use parley_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default path when `None`,
/// then validate it.
///
/// The default path gets a commented template written on first run. An
/// explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\ntemperature = 9.0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[agent]\nname = \"Fareaa\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.agent.name, "Fareaa");
    }

    #[test]
    fn load_config_missing_explicit_path() {
        let err = load_config(Some(Path::new("/nonexistent/parley.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
