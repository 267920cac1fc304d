//! Mapbox provider descriptor.

use routescrape_core::ProviderKind;
use routescrape_fetch::{FetchContext, ProviderError, RouteProvider};

use super::client::{MAPBOX_DIRECTIONS_BASE, MapboxClient};
use super::parser::parse_mapbox_routes;
use crate::descriptor::{CliConfig, GeometryFormat, ProviderDescriptor, ProviderMetadata};

/// Creates the Mapbox provider descriptor.
pub fn mapbox_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Mapbox,
        metadata: ProviderMetadata {
            display_name: "Mapbox",
            endpoint: MAPBOX_DIRECTIONS_BASE,
            docs_url: "https://docs.mapbox.com/api/navigation/directions/",
            geometry: GeometryFormat::Polyline6,
        },
        build_client: build_mapbox_client,
        parser: parse_mapbox_routes,
        cli: CliConfig {
            name: "mapbox",
            aliases: &["mb"],
        },
    }
}

fn build_mapbox_client(ctx: &FetchContext) -> Result<Box<dyn RouteProvider>, ProviderError> {
    Ok(Box::new(MapboxClient::new(ctx)?))
}
