//! API key lookup.
//!
//! Provider keys come from the process environment (`MAPBOX_API_KEY`,
//! `TOMTOM_API_KEY`, `HERE_API_KEY`). The [`CredentialSource`] trait lets
//! tests and embedders supply keys without touching the environment.

use std::collections::HashMap;

use routescrape_core::ProviderKind;
use tracing::debug;

/// Supplies the API key for a provider.
pub trait CredentialSource: Send + Sync {
    /// Returns the key, or `None` if it is not configured.
    fn api_key(&self, provider: ProviderKind) -> Option<String>;
}

/// Reads keys from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Creates an environment-backed credential source.
    pub fn new() -> Self {
        Self
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        let var = provider.api_key_env();
        let key = std::env::var(var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        debug!(provider = %provider, env = var, found = key.is_some(), "Credential lookup");
        key
    }
}

/// Keys held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    keys: HashMap<ProviderKind, String>,
}

impl StaticCredentials {
    /// Creates an empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key for a provider.
    #[must_use]
    pub fn with_key(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        self.keys.insert(provider, key.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        self.keys.get(&provider).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials() {
        let creds = StaticCredentials::new().with_key(ProviderKind::Here, "abc");
        assert_eq!(creds.api_key(ProviderKind::Here).as_deref(), Some("abc"));
        assert!(creds.api_key(ProviderKind::Mapbox).is_none());
    }
}
