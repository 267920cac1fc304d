//! HERE provider descriptor.

use routescrape_core::ProviderKind;
use routescrape_fetch::{FetchContext, ProviderError, RouteProvider};

use super::client::{HERE_ROUTES_URL, HereClient};
use super::parser::parse_here_routes;
use crate::descriptor::{CliConfig, GeometryFormat, ProviderDescriptor, ProviderMetadata};

/// Creates the HERE provider descriptor.
pub fn here_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Here,
        metadata: ProviderMetadata {
            display_name: "HERE",
            endpoint: HERE_ROUTES_URL,
            docs_url: "https://www.here.com/docs/bundle/routing-api-v8-api-reference/",
            geometry: GeometryFormat::Flexible,
        },
        build_client: build_here_client,
        parser: parse_here_routes,
        cli: CliConfig {
            name: "here",
            aliases: &["herev8"],
        },
    }
}

fn build_here_client(ctx: &FetchContext) -> Result<Box<dyn RouteProvider>, ProviderError> {
    Ok(Box::new(HereClient::new(ctx)?))
}
