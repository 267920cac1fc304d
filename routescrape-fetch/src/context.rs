//! Fetch context providing access to host APIs.
//!
//! The fetch context is passed to every provider client and bundles the
//! HTTP transport, credential lookup, and quota tracker.

use std::sync::Arc;
use std::time::Duration;

use crate::error::HttpError;
use crate::host::{
    credentials::{CredentialSource, EnvCredentials},
    http::{HttpClient, Transport},
};
use crate::provider::{DEFAULT_MAX_ALTERNATIVES, RouteOptions};
use crate::quota::{QuotaTracker, UntrackedQuota};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Timeout for a single request.
    pub timeout: Duration,
    /// Alternatives requested per route.
    pub max_alternatives: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }
}

impl FetchSettings {
    /// Sets a custom timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route options derived from these settings.
    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            max_alternatives: self.max_alternatives,
        }
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to provider clients, giving access to host APIs.
pub struct FetchContext {
    /// HTTP transport.
    pub transport: Arc<dyn Transport>,
    /// API key lookup.
    pub credentials: Arc<dyn CredentialSource>,
    /// Daily quota tracker.
    pub quota: Arc<dyn QuotaTracker>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the effective timeout for fetch operations.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<Arc<dyn CredentialSource>>,
    quota: Option<Arc<dyn QuotaTracker>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the credential source.
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the quota tracker.
    #[must_use]
    pub fn quota(mut self, quota: Arc<dyn QuotaTracker>) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the number of alternatives requested.
    #[must_use]
    pub fn max_alternatives(mut self, max_alternatives: u32) -> Self {
        self.settings.max_alternatives = max_alternatives;
        self
    }

    /// Builds the fetch context.
    ///
    /// Without an explicit transport, a reqwest client restricted to the
    /// provider hosts is created, which can fail.
    pub fn build(self) -> Result<FetchContext, HttpError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::with_timeout(self.settings.timeout)?.for_providers()),
        };

        Ok(FetchContext {
            transport,
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(EnvCredentials::new())),
            quota: self.quota.unwrap_or_else(|| Arc::new(UntrackedQuota::new())),
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::credentials::StaticCredentials;
    use routescrape_core::ProviderKind;

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .timeout(Duration::from_secs(60))
            .max_alternatives(3)
            .credentials(Arc::new(
                StaticCredentials::new().with_key(ProviderKind::Mapbox, "k"),
            ))
            .build()
            .unwrap();

        assert_eq!(ctx.timeout(), Duration::from_secs(60));
        assert_eq!(ctx.settings.route_options().max_alternatives, 3);
        assert_eq!(
            ctx.credentials.api_key(ProviderKind::Mapbox).as_deref(),
            Some("k")
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.max_alternatives, 2);
    }
}
