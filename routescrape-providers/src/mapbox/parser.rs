//! Mapbox response parser.

use routescrape_core::{ProviderKind, polyline};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::normalizer::{ParsedRoute, geometry_from, read_entry, route_entries};

const PRECISION: u32 = 6;

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    geometry: Option<String>,
}

/// Extracts `routes[]` from a Directions response.
pub fn parse_mapbox_routes(body: &Value) -> Vec<ParsedRoute> {
    let kind = ProviderKind::Mapbox;
    let entries = route_entries(body, kind);
    debug!(count = entries.len(), "Parsing Mapbox routes");

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let route: MapboxRoute = read_entry(entry, kind, index)?;
            let geometry = route
                .geometry
                .filter(|g| !g.is_empty())
                .and_then(|g| geometry_from(polyline::decode(&g, PRECISION), kind, index));
            Some(ParsedRoute {
                distance_meters: route.distance.unwrap_or(0.0),
                duration_seconds: route.duration.unwrap_or(0.0),
                geometry,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_routes() {
        let body = json!({
            "code": "Ok",
            "routes": [
                {"distance": 8123.4, "duration": 912.7, "geometry": "_izlhA~rlgdF_{geC~ywl@"},
                {"distance": 9001.0, "duration": 1000.0}
            ]
        });

        let routes = parse_mapbox_routes(&body);
        assert_eq!(routes.len(), 2);
        let line = routes[0].geometry.as_ref().unwrap();
        assert_eq!(line.len(), 2);
        assert!((line.points()[1].lon + 120.95).abs() < 1e-9);
        assert!(routes[1].geometry.is_none());
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let body = json!({"routes": [{"geometry": "_izlhA~rlgdF_{geC~ywl@"}]});
        let routes = parse_mapbox_routes(&body);
        assert_eq!(routes[0].distance_meters, 0.0);
        assert_eq!(routes[0].duration_seconds, 0.0);
    }

    #[test]
    fn test_unreadable_entry_skipped() {
        let body = json!({"routes": [
            {"distance": "far"},
            {"distance": 1.0, "duration": 2.0}
        ]});
        let routes = parse_mapbox_routes(&body);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance_meters, 1.0);
    }
}
