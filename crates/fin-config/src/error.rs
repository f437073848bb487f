use std::io;

use thiserror::Error;

/// Failures reading or writing the persisted configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("config is not valid JSON: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}
