//! Fetch error types.

use routescrape_core::{CoreError, ProviderKind};
use thiserror::Error;

// ============================================================================
// Provider Error
// ============================================================================

/// Error returned by a routing provider call.
///
/// Every variant is recoverable at the scrape loop level: the iteration is
/// skipped and the run moves on.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Origin or destination is not a valid coordinate pair.
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// The provider answered with a non-success status.
    #[error("{provider} API error {status}: {body}")]
    Status {
        /// Provider that answered.
        provider: ProviderKind,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The response body was not usable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No API key configured for the provider.
    #[error("{provider} API key not set (export {env_var})")]
    MissingCredential {
        /// Provider lacking a key.
        provider: ProviderKind,
        /// Environment variable that should hold the key.
        env_var: &'static str,
    },
}

impl ProviderError {
    /// Returns true if this error is a configuration problem rather than a
    /// per-request failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::MissingCredential { .. })
    }
}

impl From<CoreError> for ProviderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCoordinates(msg) => ProviderError::InvalidCoordinates(msg),
            other => ProviderError::InvalidResponse(other.to_string()),
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout.
    #[error("Request timed out")]
    Timeout,
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        HttpError::InvalidUrl(err.to_string())
    }
}
