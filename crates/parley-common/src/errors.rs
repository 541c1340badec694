use std::path::PathBuf;

/// Startup-time configuration failures. These are fatal: no session is
/// created while one is outstanding.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("{0} is not set. Please ensure it is defined in your environment or .env file")]
    MissingCredential(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
