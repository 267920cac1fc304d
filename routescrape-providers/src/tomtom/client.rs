//! TomTom Routing API client.

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

/// `calculateRoute` endpoint.
pub(crate) const TOMTOM_ROUTING_BASE: &str = "https://api.tomtom.com/routing/1/calculateRoute";

/// Fixed query parameters sent with every request.
const FIXED_PARAMS: &[(&str, &str)] = &[
    ("routeType", "fastest"),
    ("traffic", "true"),
    ("computeBestOrder", "false"),
    ("sectionType", "travelMode"),
    ("travelMode", "car"),
    ("computeTravelTimeFor", "all"),
    ("routeRepresentation", "encodedPolyline"),
];

// ============================================================================
// API Client
// ============================================================================

/// TomTom routing client.
#[derive(Debug, Clone)]
pub struct TomTomClient {
    core: ClientCore,
}

impl TomTomClient {
    /// Creates a client, failing if `TOMTOM_API_KEY` is not configured.
    pub fn new(ctx: &FetchContext) -> Result<Self, ProviderError> {
        Ok(Self {
            core: ClientCore::new(ProviderKind::TomTom, ctx)?,
        })
    }

    fn request_url(&self, pair: &OdPair, options: &RouteOptions) -> Result<Url, ProviderError> {
        let (o, d) = (pair.origin, pair.destination);
        let mut url = Url::parse(&format!(
            "{TOMTOM_ROUTING_BASE}/{},{}:{},{}/json",
            o.lat, o.lon, d.lat, d.lon
        ))
        .map_err(HttpError::from)?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.core.api_key);
            for (name, value) in FIXED_PARAMS {
                query.append_pair(name, value);
            }
            query.append_pair("maxAlternatives", &options.max_alternatives.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl RouteProvider for TomTomClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::TomTom
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
        debug!("Fetching TomTom route");
        let url = self.request_url(pair, options)?;
        self.core.execute(pair, url).await
    }
}

// ============================================================================
// Tests
// ============================================================================
