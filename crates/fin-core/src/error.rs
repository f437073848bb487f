use std::io;

use fin_domain::{Amount, BalanceAccount};
use thiserror::Error;

/// Failures returned by finance commands and storage collaborators.
///
/// Every variant is recoverable: the command that produced it did not apply.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Insufficient funds: {account} holds {available}, {required} required")]
    InsufficientFunds {
        account: BalanceAccount,
        required: Amount,
        available: Amount,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into())
    }

    pub fn not_found(entity: &'static str, id: &str) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Errors caused by the command itself, as opposed to the storage collaborator.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::InsufficientFunds { .. }
                | CoreError::Conflict(_)
                | CoreError::NotFound { .. }
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
