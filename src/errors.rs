use std::result::Result as StdResult;

use fin_config::ConfigError;
use fin_core::CoreError;
use fin_domain::{Amount, BalanceAccount};
use thiserror::Error;

/// Unified error type for the engine, storage and configuration layers.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Insufficient funds in {account}: {available} available, {required} required")]
    InsufficientFunds {
        account: BalanceAccount,
        required: Amount,
        available: Amount,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, FinanceError>;

impl FinanceError {
    /// Whether the failure came from the command itself rather than the environment.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FinanceError::Validation(_)
                | FinanceError::InsufficientFunds { .. }
                | FinanceError::Conflict(_)
                | FinanceError::NotFound(_)
        )
    }
}

impl From<CoreError> for FinanceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => FinanceError::Validation(message),
            CoreError::InsufficientFunds {
                account,
                required,
                available,
            } => FinanceError::InsufficientFunds {
                account,
                required,
                available,
            },
            CoreError::Conflict(message) => FinanceError::Conflict(message),
            CoreError::NotFound { entity, id } => {
                FinanceError::NotFound(format!("{} `{}`", entity, id))
            }
            CoreError::Storage(message) | CoreError::Serde(message) => {
                FinanceError::Storage(message)
            }
            CoreError::Io(err) => FinanceError::Storage(err.to_string()),
        }
    }
}

impl From<ConfigError> for FinanceError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => FinanceError::Storage(io.to_string()),
            ConfigError::Serde(message) => FinanceError::Config(message),
        }
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_category() {
        let err = FinanceError::from(CoreError::InsufficientFunds {
            account: BalanceAccount::Reserve,
            required: 7_000_000,
            available: 6_500_000,
        });
        assert!(err.is_rejection());
        assert!(matches!(
            err,
            FinanceError::InsufficientFunds {
                account: BalanceAccount::Reserve,
                ..
            }
        ));

        let err = FinanceError::from(CoreError::not_found("batch", "b9"));
        assert_eq!(err.to_string(), "Not found: batch `b9`");

        let err = FinanceError::from(CoreError::Storage("disk full".into()));
        assert!(!err.is_rejection());
    }

    #[test]
    fn config_serde_maps_to_config_error() {
        let err = FinanceError::from(ConfigError::Serde("bad".into()));
        assert!(matches!(err, FinanceError::Config(_)));
    }
}
