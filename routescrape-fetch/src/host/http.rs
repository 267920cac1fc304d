//! HTTP transport with tracing and domain allowlist.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing (without query strings, which carry API keys)
//! - Domain allowlist for security
//! - A [`Transport`] seam so provider clients can be exercised offline

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for RouteScrape.
const USER_AGENT: &str = concat!("RouteScrape/", env!("CARGO_PKG_VERSION"));

/// Hosts the provider clients talk to.
pub const PROVIDER_DOMAINS: &[&str] = &["api.mapbox.com", "api.tomtom.com", "router.hereapi.com"];

// ============================================================================
// Transport
// ============================================================================

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET request and reads the whole body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request. Query parameters are already part of `url`.
    async fn get(&self, url: &Url) -> Result<HttpResponse, HttpError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains (and their subdomains).
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Restricts requests to the routing provider hosts.
    #[must_use]
    pub fn for_providers(self) -> Self {
        self.with_allowed_domains(PROVIDER_DOMAINS.iter().map(|d| (*d).to_string()).collect())
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = url
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(
        skip(self, url),
        fields(host = url.host_str().unwrap_or_default(), path = %url.path())
    )]
    async fn get(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self.inner.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Request(e.without_url())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Request(e.without_url()))?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::new().unwrap().for_providers();

        assert!(client.is_domain_allowed(&url("https://api.mapbox.com/directions/v5")).is_ok());
        assert!(client.is_domain_allowed(&url("https://api.tomtom.com/routing/1")).is_ok());
        assert!(client.is_domain_allowed(&url("https://router.hereapi.com/v8/routes")).is_ok());

        assert!(client.is_domain_allowed(&url("https://evil.com/steal")).is_err());
        assert!(client.is_domain_allowed(&url("https://mapbox.com.evil.com/")).is_err());
    }

    #[test]
    fn test_subdomain_matching() {
        let client = HttpClient::new()
            .unwrap()
            .with_allowed_domains(vec!["hereapi.com".to_string()]);

        assert!(client.is_domain_allowed(&url("https://router.hereapi.com/v8")).is_ok());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::new().unwrap();
        assert!(client.is_domain_allowed(&url("https://any.domain.com")).is_ok());
    }

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let bad = HttpResponse { status: 401, body: String::new() };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
