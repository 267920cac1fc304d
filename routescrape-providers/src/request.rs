//! The request path shared by every provider client.
//!
//! One call, one GET. Quota is consumed only after a 2xx answer.

use std::sync::Arc;

use routescrape_core::{OdPair, ProviderKind};
use routescrape_fetch::{
    CredentialSource, FetchContext, ProviderError, QuotaTracker, RawRoute, Transport,
};
use tracing::{debug, warn};
use url::Url;

/// Maximum number of body bytes kept in a status error.
const MAX_ERROR_BODY: usize = 512;

/// Host handles every provider client keeps.
#[derive(Clone)]
pub(crate) struct ClientCore {
    pub(crate) kind: ProviderKind,
    pub(crate) api_key: String,
    transport: Arc<dyn Transport>,
    quota: Arc<dyn QuotaTracker>,
}

impl ClientCore {
    /// Looks up the API key and captures the context handles.
    pub(crate) fn new(kind: ProviderKind, ctx: &FetchContext) -> Result<Self, ProviderError> {
        let api_key = require_key(ctx.credentials.as_ref(), kind)?;
        Ok(Self {
            kind,
            api_key,
            transport: Arc::clone(&ctx.transport),
            quota: Arc::clone(&ctx.quota),
        })
    }

    pub(crate) async fn remaining(&self) -> u32 {
        self.quota.remaining(self.kind).await
    }

    /// Validates the pair, sends the request, and settles quota.
    pub(crate) async fn execute(&self, pair: &OdPair, url: Url) -> Result<RawRoute, ProviderError> {
        pair.validate()?;

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            warn!(provider = %self.kind, status = response.status, "Provider rejected request");
            return Err(ProviderError::Status {
                provider: self.kind,
                status: response.status,
                body: truncate(&response.body),
            });
        }

        if !self.quota.consume(self.kind).await {
            warn!(provider = %self.kind, "Quota already exhausted when recording request");
        }

        let body: serde_json::Value = serde_json::from_str(&response.body)?;
        debug!(provider = %self.kind, "Route response parsed");
        Ok(RawRoute::new(self.kind, body))
    }
}

impl std::fmt::Debug for ClientCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCore")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn require_key(
    credentials: &dyn CredentialSource,
    kind: ProviderKind,
) -> Result<String, ProviderError> {
    credentials
        .api_key(kind)
        .ok_or(ProviderError::MissingCredential {
            provider: kind,
            env_var: kind.api_key_env(),
        })
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use routescrape_fetch::{HttpError, HttpResponse, StaticCredentials, UntrackedQuota};

    use super::*;

    /// Transport that replays one canned response and records URLs.
    pub(crate) struct CannedTransport {
        pub(crate) status: u16,
        pub(crate) body: String,
        pub(crate) seen: Mutex<Vec<Url>>,
    }

    impl CannedTransport {
        pub(crate) fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn urls(&self) -> Vec<Url> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get(&self, url: &Url) -> Result<HttpResponse, HttpError> {
            self.seen.lock().unwrap().push(url.clone());
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// Context with a key for every provider and the given quota.
    pub(crate) fn context(
        transport: Arc<CannedTransport>,
        quota: Arc<UntrackedQuota>,
    ) -> FetchContext {
        let creds = StaticCredentials::new()
            .with_key(ProviderKind::Mapbox, "mb-key")
            .with_key(ProviderKind::TomTom, "tt-key")
            .with_key(ProviderKind::Here, "here-key");
        FetchContext::builder()
            .transport(transport)
            .credentials(Arc::new(creds))
            .quota(quota)
            .build()
            .unwrap()
    }
}
