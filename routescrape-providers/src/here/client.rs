//! HERE Routing v8 client.

use async_trait::async_trait;
use routescrape_core::{OdPair, ProviderKind};
use routescrape_fetch::{
    FetchContext, HttpError, ProviderError, RawRoute, RouteOptions, RouteProvider,
};
use tracing::{debug, instrument};
use url::Url;

use crate::request::ClientCore;

/// Routes endpoint.
pub(crate) const HERE_ROUTES_URL: &str = "https://router.hereapi.com/v8/routes";

/// HERE routing client.
#[derive(Debug, Clone)]
pub struct HereClient {
    core: ClientCore,
}

impl HereClient {
    /// Creates a client, failing if `HERE_API_KEY` is not configured.
    pub fn new(ctx: &FetchContext) -> Result<Self, ProviderError> {
        Ok(Self {
            core: ClientCore::new(ProviderKind::Here, ctx)?,
        })
    }

    fn request_url(&self, pair: &OdPair, options: &RouteOptions) -> Result<Url, ProviderError> {
        let mut url = Url::parse(HERE_ROUTES_URL).map_err(HttpError::from)?;
        url.query_pairs_mut()
            .append_pair("transportMode", "car")
            .append_pair("origin", &pair.origin.to_string())
            .append_pair("destination", &pair.destination.to_string())
            .append_pair("return", "summary,polyline")
            .append_pair("alternatives", &options.max_alternatives.to_string())
            .append_pair("apiKey", &self.core.api_key);
        Ok(url)
    }
}

#[async_trait]
impl RouteProvider for HereClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Here
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
        debug!("Fetching HERE route");
        let url = self.request_url(pair, options)?;
        self.core.execute(pair, url).await
    }
}
