//! Mapbox Directions API client.

use async_trait::async_trait;
use routescrape_core::{OdPair, ProviderKind};
use routescrape_fetch::{
    FetchContext, HttpError, ProviderError, RawRoute, RouteOptions, RouteProvider,
};
use tracing::{debug, instrument};
use url::Url;

use crate::request::ClientCore;

// ============================================================================
// Constants
// ============================================================================

/// Directions endpoint for the driving profile.
pub(crate) const MAPBOX_DIRECTIONS_BASE: &str =
    "https://api.mapbox.com/directions/v5/mapbox/driving";

// ============================================================================
// API Client
// ============================================================================

/// Mapbox Directions client.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    core: ClientCore,
}

impl MapboxClient {
    /// Creates a client, failing if `MAPBOX_API_KEY` is not configured.
    pub fn new(ctx: &FetchContext) -> Result<Self, ProviderError> {
        Ok(Self {
            core: ClientCore::new(ProviderKind::Mapbox, ctx)?,
        })
    }

    /// Builds the request URL. Mapbox wants `lon,lat` ordering.
    fn request_url(&self, pair: &OdPair, options: &RouteOptions) -> Result<Url, ProviderError> {
        let (o, d) = (pair.origin, pair.destination);
        let mut url = Url::parse(&format!(
            "{MAPBOX_DIRECTIONS_BASE}/{},{};{},{}",
            o.lon, o.lat, d.lon, d.lat
        ))
        .map_err(HttpError::from)?;

        let alternatives = if options.max_alternatives > 0 { "true" } else { "false" };
        url.query_pairs_mut()
            .append_pair("alternatives", alternatives)
            .append_pair("geometries", "polyline6")
            .append_pair("overview", "full")
            .append_pair("steps", "false")
            .append_pair("access_token", &self.core.api_key);
        Ok(url)
    }
}

#[async_trait]
impl RouteProvider for MapboxClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mapbox
    }

    async fn remaining_quota(&self) -> u32 {
        self.core.remaining().await
    }

    #[instrument(skip(self, options), fields(origin = %pair.origin, destination = %pair.destination))]
    async fn fetch_route(
        &self,
        pair: &OdPair,
        options: &RouteOptions,
    ) -> Result<RawRoute, ProviderError> {
        debug!("Fetching Mapbox route");
        let url = self.request_url(pair, options)?;
        self.core.execute(pair, url).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::request::testing::{CannedTransport, context};
    use routescrape_fetch::UntrackedQuota;

    fn pair() -> OdPair {
        OdPair::from_slices(&[10.7725, 106.6980], &[10.8231, 106.6297]).unwrap()
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = CannedTransport::new(200, r#"{"routes":[]}"#);
        let ctx = context(transport.clone(), Arc::new(UntrackedQuota::new()));
        let client = MapboxClient::new(&ctx).unwrap();

        client.fetch_route(&pair(), &RouteOptions::default()).await.unwrap();

        let urls = transport.urls();
        assert_eq!(urls.len(), 1);
        let url = &urls[0];
        assert_eq!(url.host_str(), Some("api.mapbox.com"));
        assert_eq!(
            url.path(),
            "/directions/v5/mapbox/driving/106.698,10.7725;106.6297,10.8231"
        );
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("geometries".into(), "polyline6".into())));
        assert!(query.contains(&("alternatives".into(), "true".into())));
        assert!(query.contains(&("access_token".into(), "mb-key".into())));
    }

    #[tokio::test]
    async fn test_no_alternatives() {
        let transport = CannedTransport::new(200, r#"{"routes":[]}"#);
        let ctx = context(transport.clone(), Arc::new(UntrackedQuota::new()));
        let client = MapboxClient::new(&ctx).unwrap();

        let options = RouteOptions { max_alternatives: 0 };
        client.fetch_route(&pair(), &options).await.unwrap();

        let url = &transport.urls()[0];
        assert!(url.query().unwrap().contains("alternatives=false"));
    }

    #[test]
    fn test_debug_hides_key() {
        let transport = CannedTransport::new(200, "{}");
        let ctx = context(transport, Arc::new(UntrackedQuota::new()));
        let client = MapboxClient::new(&ctx).unwrap();
        assert!(!format!("{client:?}").contains("mb-key"));
    }
}
