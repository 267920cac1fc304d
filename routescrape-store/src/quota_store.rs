//! Persistent daily quota per provider.
//!
//! The quota file maps each provider to its [`QuotaRecord`]:
//!
//! ```json
//! { "mapbox": { "provider": "mapbox", "requests_remaining": 2999,
//!               "daily_limit": 3000, "last_reset_date": "2025-06-01" } }
//! ```
//!
//! Every mutation is written through immediately. A failed write is logged
//! and the in-memory record stays authoritative for the rest of the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use routescrape_core::{ProviderKind, QuotaRecord};
use routescrape_fetch::QuotaTracker;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// On-disk layout of the quota file.
pub type QuotaFile = BTreeMap<ProviderKind, QuotaRecord>;

/// Daily limit overrides per provider.
pub type DailyLimits = BTreeMap<ProviderKind, u32>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// Quota Store
// ============================================================================

/// Daily request allowance for every provider, backed by a JSON file.
#[derive(Debug)]
pub struct QuotaStore {
    path: PathBuf,
    limits: DailyLimits,
    records: QuotaFile,
}

impl QuotaStore {
    /// Opens the quota file, rolling records over to today.
    pub async fn open(path: impl Into<PathBuf>, limits: DailyLimits) -> Self {
        Self::open_on(path, limits, today()).await
    }

    /// Opens the quota file as of `today`.
    ///
    /// A missing file starts every provider with a full allowance; a corrupt
    /// one does the same after a warning.
    #[instrument(skip_all, fields(today = %today))]
    pub async fn open_on(path: impl Into<PathBuf>, limits: DailyLimits, today: NaiveDate) -> Self {
        let path = path.into();
        let (mut records, mut dirty) = match load_json::<QuotaFile>(&path).await {
            Ok(records) => (records, false),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No quota file, starting with full allowance");
                (QuotaFile::new(), true)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Quota file unreadable, resetting");
                (QuotaFile::new(), true)
            }
        };

        for &kind in ProviderKind::all() {
            let limit = limits
                .get(&kind)
                .copied()
                .unwrap_or_else(|| kind.default_daily_limit());
            let record = records
                .entry(kind)
                .or_insert_with(|| {
                    dirty = true;
                    QuotaRecord::fresh(kind, limit, today)
                });
            // Guards against a hand-edited file keyed under the wrong provider.
            record.provider = kind;
            dirty |= record.apply_limit(limit);
            dirty |= record.roll_over(today);
        }

        let store = Self {
            path,
            limits,
            records,
        };
        if dirty {
            store.persist().await;
        }
        store
    }

    /// Path of the quota file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured daily limit for a provider.
    pub fn daily_limit(&self, kind: ProviderKind) -> u32 {
        self.limits
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_daily_limit())
    }

    /// Remaining requests for today.
    pub async fn remaining(&mut self, kind: ProviderKind) -> u32 {
        self.remaining_on(kind, today()).await
    }

    /// Remaining requests as of `today`, rolling over first.
    pub async fn remaining_on(&mut self, kind: ProviderKind, today: NaiveDate) -> u32 {
        let record = self.record_mut(kind, today);
        let changed = record.roll_over(today);
        let remaining = record.requests_remaining;
        if changed {
            info!(provider = %kind, remaining, "Daily quota reset");
            self.persist().await;
        }
        remaining
    }

    /// Consumes one request for today.
    pub async fn consume(&mut self, kind: ProviderKind) -> bool {
        self.consume_on(kind, today()).await
    }

    /// Consumes one request as of `today`.
    ///
    /// Returns false, without writing, when the allowance is exhausted.
    pub async fn consume_on(&mut self, kind: ProviderKind, today: NaiveDate) -> bool {
        let record = self.record_mut(kind, today);
        let rolled = record.roll_over(today);
        let consumed = record.try_consume();
        let remaining = record.requests_remaining;

        if consumed || rolled {
            self.persist().await;
        }
        if consumed {
            debug!(provider = %kind, remaining, "Quota consumed");
        } else {
            warn!(provider = %kind, "Daily quota exhausted");
        }
        consumed
    }

    /// Snapshot of a provider's record.
    pub fn record(&self, kind: ProviderKind) -> Option<&QuotaRecord> {
        self.records.get(&kind)
    }

    /// All records, ordered by provider.
    pub fn records(&self) -> impl Iterator<Item = &QuotaRecord> {
        self.records.values()
    }

    /// Refills a provider's allowance immediately.
    pub async fn reset(&mut self, kind: ProviderKind) {
        let limit = self.daily_limit(kind);
        self.records
            .insert(kind, QuotaRecord::fresh(kind, limit, today()));
        info!(provider = %kind, limit, "Quota reset by request");
        self.persist().await;
    }

    fn record_mut(&mut self, kind: ProviderKind, today: NaiveDate) -> &mut QuotaRecord {
        let limit = self.daily_limit(kind);
        self.records
            .entry(kind)
            .or_insert_with(|| QuotaRecord::fresh(kind, limit, today))
    }

    async fn persist(&self) {
        if let Err(e) = save_json(&self.path, &self.records).await {
            warn!(path = %self.path.display(), error = %e, "Failed to persist quota");
        }
    }

    /// Wraps the store for sharing with provider clients.
    pub fn into_shared(self) -> SharedQuotaStore {
        SharedQuotaStore::new(self)
    }
}

// ============================================================================
// Shared Quota Store
// ============================================================================

/// A [`QuotaStore`] behind an async mutex, usable as a [`QuotaTracker`].
#[derive(Debug, Clone)]
pub struct SharedQuotaStore {
    inner: Arc<Mutex<QuotaStore>>,
}

impl SharedQuotaStore {
    /// Wraps a store.
    pub fn new(store: QuotaStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    pub async fn with<R>(&self, f: impl FnOnce(&QuotaStore) -> R) -> R {
        let store = self.inner.lock().await;
        f(&store)
    }
}

#[async_trait]
impl QuotaTracker for SharedQuotaStore {
    async fn remaining(&self, provider: ProviderKind) -> u32 {
        self.inner.lock().await.remaining(provider).await
    }

    async fn consume(&self, provider: ProviderKind) -> bool {
        self.inner.lock().await.consume(provider).await
    }
}

// ============================================================================
// Tests
// ============================================================================
