use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur during table operations.
///
/// `Inconsistent` is never downgraded or merged with transient
/// failures: it means the index and data tables disagree about a
/// record's existence and an operator (or a repair job) has to look.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("store {operation} failed for {entity}: {message}")]
    Store {
        entity: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("{operation} retries exhausted for {entity} {key}")]
    RetriesExhausted {
        entity: &'static str,
        operation: &'static str,
        key: String,
    },

    #[error("inconsistent table state: {detail}")]
    Inconsistent { detail: String },

    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl TableError {
    pub fn not_found(entity: &'static str, partition: &impl Display, range: &impl Display) -> Self {
        TableError::NotFound {
            entity,
            key: key_display(partition, range),
        }
    }

    pub fn store(entity: &'static str, operation: &'static str, message: impl Display) -> Self {
        TableError::Store {
            entity,
            operation,
            message: message.to_string(),
        }
    }

    /// True when the error reports index/data divergence.
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, TableError::Inconsistent { .. })
    }
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Formats a key pair for error and log context.
pub fn key_display(partition: &impl Display, range: &impl Display) -> String {
    format!("{partition}:{range}")
}
