//! Daily quota bookkeeping seen from the provider side.
//!
//! Providers ask the tracker how many requests are left and consume one
//! unit after every successful response. The persistent implementation
//! lives in `routescrape-store`; [`UntrackedQuota`] is an in-memory stand-in.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use routescrape_core::ProviderKind;

/// Tracks the remaining daily requests per provider.
#[async_trait]
pub trait QuotaTracker: Send + Sync {
    /// Remaining requests for today.
    async fn remaining(&self, provider: ProviderKind) -> u32;

    /// Consumes one request. Returns false if nothing was left.
    async fn consume(&self, provider: ProviderKind) -> bool;
}

/// In-memory quota that is never persisted.
///
/// Without explicit limits every provider is unlimited.
#[derive(Debug, Default)]
pub struct UntrackedQuota {
    limits: Mutex<HashMap<ProviderKind, u32>>,
}

impl UntrackedQuota {
    /// Creates an unlimited tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps a provider at `remaining` requests.
    #[must_use]
    pub fn with_remaining(self, provider: ProviderKind, remaining: u32) -> Self {
        if let Ok(mut limits) = self.limits.lock() {
            limits.insert(provider, remaining);
        }
        self
    }
}

#[async_trait]
impl QuotaTracker for UntrackedQuota {
    async fn remaining(&self, provider: ProviderKind) -> u32 {
        self.limits
            .lock()
            .ok()
            .and_then(|limits| limits.get(&provider).copied())
            .unwrap_or(u32::MAX)
    }

    async fn consume(&self, provider: ProviderKind) -> bool {
        let Ok(mut limits) = self.limits.lock() else {
            return false;
        };
        match limits.get_mut(&provider) {
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
            None => true,
        }
    }
}
