//! The scrape loop.
//!
//! A run issues one provider request per iteration, normalizes every route
//! in the response, and appends each trip to the ledger under a fresh id.
//! Quota is checked up front for the whole run and again before every
//! request, since other processes may share the quota file.
//!
//! Only quota exhaustion and a dead origin/destination source stop a run.
//! Provider and ledger failures are logged, counted, and skipped.

use std::time::Duration;

use rand::Rng;
use routescrape_core::{CoreError, OdSource, ProviderKind, RouteCount, TripDraft};
use routescrape_fetch::{RawRoute, RouteOptions, RouteProvider};
use routescrape_providers::normalize_now;
use routescrape_store::{StoreError, TripLedger};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

// ============================================================================
// Errors
// ============================================================================

/// Reasons a run stops early.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Not enough quota left to issue the requested calls.
    #[error("quota exhausted: {requested} request(s) wanted, {remaining} remaining today")]
    QuotaExhausted {
        /// Requests still to be issued.
        requested: u32,
        /// Quota left for the provider.
        remaining: u32,
    },

    /// The requested run shape is not built.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The origin/destination source cannot produce pairs.
    #[error("origin/destination source failed: {0}")]
    Source(#[from] CoreError),
}

// ============================================================================
// Pacing
// ============================================================================

/// Bounds of the random pause between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Shortest pause.
    pub min: Duration,
    /// Longest pause.
    pub max: Duration,
}

impl Pacing {
    /// Creates pacing bounds, swapping them if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1500))
    }
}

// ============================================================================
// Report
// ============================================================================

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    /// Provider that served the run.
    pub provider: ProviderKind,
    /// Requests the run was asked to issue.
    pub requested: u32,
    /// Requests that returned a usable response.
    pub succeeded_requests: u32,
    /// Requests that failed.
    pub failed_requests: u32,
    /// Trips appended to the ledger.
    pub trips_written: u32,
    /// Trips lost to ledger errors.
    pub write_failures: u32,
}

impl ScrapeReport {
    fn new(provider: ProviderKind, requested: u32) -> Self {
        Self {
            provider,
            requested,
            succeeded_requests: 0,
            failed_requests: 0,
            trips_written: 0,
            write_failures: 0,
        }
    }
}

// ============================================================================
// Scraper
// ============================================================================

/// Drives one provider, one pair source and the trip ledger.
pub struct Scraper {
    provider: Box<dyn RouteProvider>,
    source: Box<dyn OdSource>,
    ledger: TripLedger,
    options: RouteOptions,
    pacing: Pacing,
}

impl Scraper {
    /// Creates a scraper with default options and pacing.
    pub fn new(
        provider: Box<dyn RouteProvider>,
        source: Box<dyn OdSource>,
        ledger: TripLedger,
    ) -> Self {
        Self {
            provider,
            source,
            ledger,
            options: RouteOptions::default(),
            pacing: Pacing::default(),
        }
    }

    /// Sets the per-request options.
    #[must_use]
    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the pause between requests.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Runs the loop.
    #[instrument(skip(self), fields(provider = %self.provider.kind(), source = self.source.name()))]
    pub async fn run(&mut self, count: RouteCount) -> Result<ScrapeReport, ScrapeError> {
        let requested = match count {
            RouteCount::Count(n) => n,
            RouteCount::Schedule => {
                return Err(ScrapeError::NotImplemented(
                    "scheduled scraping".to_string(),
                ));
            }
        };

        let kind = self.provider.kind();
        let remaining = self.provider.remaining_quota().await;
        if requested > remaining {
            warn!(requested, remaining, "Not enough quota for this run");
            return Err(ScrapeError::QuotaExhausted {
                requested,
                remaining,
            });
        }
        info!(requested, remaining, "Starting scrape");

        let mut report = ScrapeReport::new(kind, requested);
        for iteration in 0..requested {
            let remaining = self.provider.remaining_quota().await;
            if remaining == 0 {
                warn!(
                    done = iteration,
                    trips = report.trips_written,
                    "Quota ran out mid-run"
                );
                return Err(ScrapeError::QuotaExhausted {
                    requested: requested - iteration,
                    remaining,
                });
            }

            let pair = self.source.next_pair()?;
            debug!(iteration, origin = %pair.origin, destination = %pair.destination, "Requesting route");

            match self.provider.fetch_route(&pair, &self.options).await {
                Ok(raw) => {
                    report.succeeded_requests += 1;
                    self.record(&raw, &mut report).await;
                }
                Err(e) => {
                    report.failed_requests += 1;
                    warn!(iteration, error = %e, "Route request failed");
                }
            }

            if iteration + 1 < requested {
                let pause = self.pacing.sample(&mut rand::thread_rng());
                if !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
            }
        }

        info!(
            succeeded = report.succeeded_requests,
            failed = report.failed_requests,
            trips = report.trips_written,
            "Scrape finished"
        );
        Ok(report)
    }

    async fn record(&mut self, raw: &RawRoute, report: &mut ScrapeReport) {
        let drafts = normalize_now(raw);
        if drafts.is_empty() {
            warn!(provider = %raw.provider, "Response held no usable routes");
        }
        for draft in drafts {
            match self.write(draft).await {
                Ok(trip_id) => {
                    report.trips_written += 1;
                    debug!(trip_id, "Trip stored");
                }
                Err(e) => {
                    report.write_failures += 1;
                    warn!(error = %e, "Failed to store trip");
                }
            }
        }
    }

    async fn write(&mut self, draft: TripDraft) -> Result<u64, StoreError> {
        let trip_id = self.ledger.next_trip_id().await?;
        self.ledger.append(&draft.with_id(trip_id)).await?;
        Ok(trip_id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use routescrape_core::{FixedOdSource, OdPair};
    use routescrape_fetch::{
        FetchContext, HttpError, HttpResponse, ProviderError, QuotaTracker, StaticCredentials,
        Transport, UntrackedQuota,
    };
    use routescrape_providers::MapboxClient;
    use routescrape_store::{DailyLimits, QuotaStore};
    use url::Url;

    const MAPBOX_TWO_ROUTES: &str = r#"{"code": "Ok", "routes": [
        {"distance": 1200.5, "duration": 300, "geometry": "_izlhA~rlgdF_{geC~ywl@"},
        {"distance": 1500, "duration": 360, "geometry": "_izlhA~rlgdF_{geC~ywl@"}
    ]}"#;

    struct CannedTransport {
        status: u16,
        body: String,
        calls: AtomicUsize,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get(&self, _url: &Url) -> Result<HttpResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// Provider whose quota drains faster than its own requests.
    struct DrainingProvider {
        remaining: AtomicU32,
        drain_per_call: u32,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl RouteProvider for DrainingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::TomTom
        }

        async fn remaining_quota(&self) -> u32 {
            self.remaining.load(Ordering::SeqCst)
        }

        async fn fetch_route(
            &self,
            _pair: &OdPair,
            _options: &RouteOptions,
        ) -> Result<RawRoute, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.remaining.load(Ordering::SeqCst);
            self.remaining
                .store(left.saturating_sub(self.drain_per_call), Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Status {
                    provider: ProviderKind::TomTom,
                    status: 503,
                    body: "busy".to_string(),
                });
            }
            Ok(RawRoute::new(
                ProviderKind::TomTom,
                serde_json::json!({"routes": [{"summary": {"lengthInMeters": 10, "travelTimeInSeconds": 5},
                                               "legs": [{"encodedPolyline": "_p~iF~ps|U_ulLnnqC"}]}]}),
            ))
        }
    }

    fn source() -> Box<dyn OdSource> {
        let pair = OdPair::from_slices(&[10.7725, 106.658], &[10.8157, 106.71]).unwrap();
        Box::new(FixedOdSource::new(vec![pair]))
    }

    async fn ledger(dir: &Path) -> TripLedger {
        TripLedger::open(dir.join("trips.csv"), dir.join("trip_counter.json"))
            .await
            .unwrap()
    }

    fn mapbox(transport: Arc<CannedTransport>, quota: Arc<dyn QuotaTracker>) -> Box<dyn RouteProvider> {
        let ctx = FetchContext::builder()
            .transport(transport)
            .credentials(Arc::new(
                StaticCredentials::new().with_key(ProviderKind::Mapbox, "mb-key"),
            ))
            .quota(quota)
            .build()
            .unwrap();
        Box::new(MapboxClient::new(&ctx).unwrap())
    }

    #[tokio::test]
    async fn test_one_request_two_trips() {
        let dir = tempfile::tempdir().unwrap();
        let limits = DailyLimits::from([(ProviderKind::Mapbox, 5)]);
        let quota = QuotaStore::open(dir.path().join("quota.json"), limits)
            .await
            .into_shared();
        let transport = CannedTransport::new(200, MAPBOX_TWO_ROUTES);

        let mut scraper = Scraper::new(
            mapbox(transport.clone(), Arc::new(quota.clone())),
            source(),
            ledger(dir.path()).await,
        )
        .with_pacing(Pacing::none());

        let report = scraper.run(RouteCount::Count(1)).await.unwrap();
        assert_eq!(report.succeeded_requests, 1);
        assert_eq!(report.trips_written, 2);
        assert_eq!(transport.calls(), 1);

        let remaining = quota
            .with(|s| s.record(ProviderKind::Mapbox).map(|r| r.requests_remaining))
            .await;
        assert_eq!(remaining, Some(4));

        let csv = tokio::fs::read_to_string(dir.path().join("trips.csv"))
            .await
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));
        assert!(lines[1].contains("LINESTRING (-120.2 38.5, -120.95 40.7)"));
    }

    #[tokio::test]
    async fn test_insufficient_quota_issues_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CannedTransport::new(200, MAPBOX_TWO_ROUTES);
        let quota = UntrackedQuota::new().with_remaining(ProviderKind::Mapbox, 0);

        let mut scraper = Scraper::new(
            mapbox(transport.clone(), Arc::new(quota)),
            source(),
            ledger(dir.path()).await,
        )
        .with_pacing(Pacing::none());

        let err = scraper.run(RouteCount::Count(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::QuotaExhausted {
                requested: 1,
                remaining: 0
            }
        ));
        assert_eq!(transport.calls(), 0);
        assert!(!dir.path().join("trips.csv").exists());
    }

    #[tokio::test]
    async fn test_bad_geometry_keeps_trip_and_run_going() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"routes": [{"distance": 50, "duration": 9, "geometry": "~"}]}"#;
        let transport = CannedTransport::new(200, body);

        let mut scraper = Scraper::new(
            mapbox(transport.clone(), Arc::new(UntrackedQuota::new())),
            source(),
            ledger(dir.path()).await,
        )
        .with_pacing(Pacing::none());

        let report = scraper.run(RouteCount::Count(2)).await.unwrap();
        assert_eq!(report.trips_written, 2);
        assert_eq!(transport.calls(), 2);

        let csv = tokio::fs::read_to_string(dir.path().join("trips.csv"))
            .await
            .unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",50,9,"));
    }

    #[tokio::test]
    async fn test_http_errors_are_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CannedTransport::new(429, r#"{"message": "slow down"}"#);
        let quota = Arc::new(UntrackedQuota::new().with_remaining(ProviderKind::Mapbox, 3));

        let mut scraper = Scraper::new(
            mapbox(transport.clone(), quota.clone()),
            source(),
            ledger(dir.path()).await,
        )
        .with_pacing(Pacing::none());

        let report = scraper.run(RouteCount::Count(3)).await.unwrap();
        assert_eq!(report.failed_requests, 3);
        assert_eq!(report.trips_written, 0);
        assert_eq!(transport.calls(), 3);
        assert_eq!(quota.remaining(ProviderKind::Mapbox).await, 3);
    }

    #[tokio::test]
    async fn test_quota_drained_elsewhere_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = DrainingProvider {
            remaining: AtomicU32::new(4),
            drain_per_call: 2,
            calls: calls.clone(),
            fail: false,
        };

        let mut scraper = Scraper::new(Box::new(provider), source(), ledger(dir.path()).await)
            .with_pacing(Pacing::none());

        let err = scraper.run(RouteCount::Count(4)).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::QuotaExhausted {
                requested: 2,
                remaining: 0
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let stats = ledger(dir.path()).await.stats().await.unwrap();
        assert_eq!(stats.rows, 2);
    }

    #[tokio::test]
    async fn test_provider_failures_continue() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = DrainingProvider {
            remaining: AtomicU32::new(10),
            drain_per_call: 0,
            calls: calls.clone(),
            fail: true,
        };

        let mut scraper = Scraper::new(Box::new(provider), source(), ledger(dir.path()).await)
            .with_pacing(Pacing::none());

        let report = scraper.run(RouteCount::Count(3)).await.unwrap();
        assert_eq!(report.failed_requests, 3);
        assert_eq!(report.succeeded_requests, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_schedule_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let transport = CannedTransport::new(200, MAPBOX_TWO_ROUTES);
        let mut scraper = Scraper::new(
            mapbox(transport.clone(), Arc::new(UntrackedQuota::new())),
            source(),
            ledger(dir.path()).await,
        );

        let err = scraper.run(RouteCount::Schedule).await.unwrap_err();
        assert!(matches!(err, ScrapeError::NotImplemented(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_dead_source_is_fatal() {
        struct Empty;
        impl OdSource for Empty {
            fn name(&self) -> &str {
                "empty"
            }
            fn next_pair(&mut self) -> Result<OdPair, CoreError> {
                Err(CoreError::NoOdPair("nothing".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let transport = CannedTransport::new(200, MAPBOX_TWO_ROUTES);
        let mut scraper = Scraper::new(
            mapbox(transport.clone(), Arc::new(UntrackedQuota::new())),
            Box::new(Empty),
            ledger(dir.path()).await,
        );

        let err = scraper.run(RouteCount::Count(1)).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Source(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_pacing_bounds() {
        let pacing = Pacing::new(Duration::from_millis(900), Duration::from_millis(100));
        assert_eq!(pacing.min, Duration::from_millis(100));

        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let pause = pacing.sample(&mut rng);
            assert!(pause >= pacing.min && pause <= pacing.max);
        }
        assert_eq!(Pacing::none().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_report_serializes() {
        let report = ScrapeReport::new(ProviderKind::Here, 4);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["provider"], "here");
        assert_eq!(json["requested"], 4);
        assert_eq!(json["tripsWritten"], 0);
    }
}
