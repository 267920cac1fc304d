//! TomTom provider descriptor.

use routescrape_core::ProviderKind;
use routescrape_fetch::{FetchContext, ProviderError, RouteProvider};

use super::client::{TOMTOM_ROUTING_BASE, TomTomClient};
use super::parser::parse_tomtom_routes;
use crate::descriptor::{CliConfig, GeometryFormat, ProviderDescriptor, ProviderMetadata};

/// Creates the TomTom provider descriptor.
pub fn tomtom_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::TomTom,
        metadata: ProviderMetadata {
            display_name: "TomTom",
            endpoint: TOMTOM_ROUTING_BASE,
            docs_url: "https://developer.tomtom.com/routing-api/documentation",
            geometry: GeometryFormat::Polyline5,
        },
        build_client: build_tomtom_client,
        parser: parse_tomtom_routes,
        cli: CliConfig {
            name: "tomtom",
            aliases: &["tt"],
        },
    }
}

fn build_tomtom_client(ctx: &FetchContext) -> Result<Box<dyn RouteProvider>, ProviderError> {
    Ok(Box::new(TomTomClient::new(ctx)?))
}
