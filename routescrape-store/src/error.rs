//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV read or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The place catalog cannot satisfy the request.
    #[error("Place catalog has {available} usable rows, need at least {needed}")]
    NotEnoughPlaces {
        /// Rows loaded.
        available: usize,
        /// Rows required.
        needed: usize,
    },
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }

    /// Returns true if the error stems from configuration or catalog contents.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StoreError::Config(_) | StoreError::NotEnoughPlaces { .. }
        )
    }
}
