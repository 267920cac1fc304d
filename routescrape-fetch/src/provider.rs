//! The routing provider trait.
//!
//! A provider turns one origin/destination pair into exactly one HTTP
//! request and hands back the provider's JSON untouched. Turning that JSON
//! into trips is the normalizer's job.

use async_trait::async_trait;
use routescrape_core::{OdPair, ProviderKind};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

// ============================================================================
// Route Options
// ============================================================================

/// Default number of alternative routes requested.
pub const DEFAULT_MAX_ALTERNATIVES: u32 = 2;

/// Per-request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Alternatives to ask for (providers that support it).
    pub max_alternatives: u32,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }
}

// ============================================================================
// Raw Route
// ============================================================================

/// A provider response that has not been normalized yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    /// Provider that produced the body.
    pub provider: ProviderKind,
    /// Parsed JSON body.
    pub body: serde_json::Value,
}

impl RawRoute {
    /// Wraps a response body.
    pub fn new(provider: ProviderKind, body: serde_json::Value) -> Self {
        Self { provider, body }
    }
}

// ============================================================================
// Route Provider Trait
// ============================================================================

/// A routing provider client.
///
/// ## Contract
///
/// - `fetch_route` issues at most one HTTP request.
/// - On a 2xx response, exactly one quota unit is consumed.
/// - On a non-2xx response, no quota is consumed and
///   [`ProviderError::Status`] is returned.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Which provider this client talks to.
    fn kind(&self) -> ProviderKind;

    /// Remaining requests for today.
    async fn remaining_quota(&self) -> u32;

    /// Requests a route between the pair's endpoints.
    async fn fetch_route(
        &self,
        pair: &OdPair,
        options: &RouteOptions,
    ) -> Result<RawRoute, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        assert_eq!(RouteOptions::default().max_alternatives, 2);
    }
}
