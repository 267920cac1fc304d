//! TomTom response parser.

use routescrape_core::{ProviderKind, polyline};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::normalizer::{ParsedRoute, geometry_from, read_entry, route_entries};

const PRECISION: u32 = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TomTomRoute {
    #[serde(default)]
    summary: TomTomSummary,
    #[serde(default)]
    legs: Vec<TomTomLeg>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TomTomSummary {
    #[serde(default)]
    length_in_meters: Option<f64>,
    #[serde(default)]
    travel_time_in_seconds: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TomTomLeg {
    #[serde(default)]
    encoded_polyline: Option<String>,
}

/// Extracts `routes[]` from a `calculateRoute` response.
///
/// Geometry is taken from the first leg only; requests carry no waypoints,
/// so every route has exactly one leg.
pub fn parse_tomtom_routes(body: &Value) -> Vec<ParsedRoute> {
    let kind = ProviderKind::TomTom;
    let entries = route_entries(body, kind);
    debug!(count = entries.len(), "Parsing TomTom routes");

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let route: TomTomRoute = read_entry(entry, kind, index)?;
            let geometry = route
                .legs
                .into_iter()
                .next()
                .and_then(|leg| leg.encoded_polyline)
                .filter(|g| !g.is_empty())
                .and_then(|g| geometry_from(polyline::decode(&g, PRECISION), kind, index));
            Some(ParsedRoute {
                distance_meters: route.summary.length_in_meters.unwrap_or(0.0),
                duration_seconds: route.summary.travel_time_in_seconds.unwrap_or(0.0),
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
            "formatVersion": "0.0.12",
            "routes": [{
                "summary": {"lengthInMeters": 5230, "travelTimeInSeconds": 780},
                "legs": [{"encodedPolyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@", "encodedPolylinePrecision": 5}]
            }]
        });

        let routes = parse_tomtom_routes(&body);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance_meters, 5230.0);
        assert_eq!(routes[0].duration_seconds, 780.0);
        let line = routes[0].geometry.as_ref().unwrap();
        assert_eq!(line.len(), 3);
        assert!((line.points()[2].lat - 43.252).abs() < 1e-9);
    }

    #[test]
    fn test_route_without_legs() {
        let body = json!({"routes": [{"summary": {"lengthInMeters": 10}}]});
        let routes = parse_tomtom_routes(&body);
        assert_eq!(routes.len(), 1);
        assert!(routes[0].geometry.is_none());
        assert_eq!(routes[0].duration_seconds, 0.0);
    }

    #[test]
    fn test_truncated_polyline() {
        let body = json!({"routes": [{
            "summary": {"lengthInMeters": 10, "travelTimeInSeconds": 4},
            "legs": [{"encodedPolyline": "_p~iF~ps|U_"}]
        }]});
        let routes = parse_tomtom_routes(&body);
        assert!(routes[0].geometry.is_none());
        assert_eq!(routes[0].distance_meters, 10.0);
    }
}
