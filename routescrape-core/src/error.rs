//! Core error types for `RouteScrape`.

use thiserror::Error;

/// Core error type for `RouteScrape` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider not found or not configured.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Origin or destination is not a valid `[lat, lon]` pair.
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested mode exists but has not been built yet.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// An origin/destination source could not produce a pair.
    #[error("No origin/destination available: {0}")]
    NoOdPair(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true if this error marks a feature that is not built yet.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, CoreError::NotImplemented(_))
    }
}
