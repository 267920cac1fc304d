//! Route normalizer.
//!
//! Turns a provider's raw JSON into [`TripDraft`]s. Each provider ships its
//! own parser in its descriptor; this module picks the parser through the
//! registry and stamps every route with the capture time.
//!
//! A bad route entry never spoils the rest of the response: unreadable
//! entries are skipped and undecodable geometry becomes `None`, both with a
//! warning.

use chrono::Utc;
use routescrape_core::{Coordinate, DecodeError, LineString, ProviderKind, TripDraft};
use routescrape_fetch::RawRoute;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::ProviderRegistry;

// ============================================================================
// Parsed Route
// ============================================================================

/// One route extracted from a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRoute {
    /// Route length in meters.
    pub distance_meters: f64,
    /// Travel time in seconds.
    pub duration_seconds: f64,
    /// Decoded path.
    pub geometry: Option<LineString>,
}

impl ParsedRoute {
    fn into_draft(self, captured_at: i64) -> TripDraft {
        TripDraft::new(
            captured_at,
            self.distance_meters,
            self.duration_seconds,
            self.geometry,
        )
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalizes a raw response captured at `captured_at` (Unix seconds).
pub fn normalize(raw: &RawRoute, captured_at: i64) -> Vec<TripDraft> {
    let Some(descriptor) = ProviderRegistry::get(raw.provider) else {
        warn!(provider = %raw.provider, "No parser registered");
        return Vec::new();
    };

    let drafts: Vec<TripDraft> = (descriptor.parser)(&raw.body)
        .into_iter()
        .map(|route| route.into_draft(captured_at))
        .collect();

    debug!(provider = %raw.provider, routes = drafts.len(), "Normalized response");
    drafts
}

/// Normalizes a raw response stamped with the current time.
pub fn normalize_now(raw: &RawRoute) -> Vec<TripDraft> {
    normalize(raw, Utc::now().timestamp())
}

// ============================================================================
// Parser Helpers
// ============================================================================

/// Returns the `routes` array, or an empty slice with a warning.
pub(crate) fn route_entries(body: &Value, provider: ProviderKind) -> &[Value] {
    match body.get("routes").and_then(Value::as_array) {
        Some(routes) => routes,
        None => {
            warn!(provider = %provider, "Response has no routes array");
            &[]
        }
    }
}

/// Deserializes one route entry, skipping it with a warning on failure.
pub(crate) fn read_entry<T: DeserializeOwned>(
    entry: &Value,
    provider: ProviderKind,
    index: usize,
) -> Option<T> {
    match T::deserialize(entry) {
        Ok(route) => Some(route),
        Err(e) => {
            warn!(provider = %provider, index, error = %e, "Skipping unreadable route");
            None
        }
    }
}

/// Turns a decode result into a path, logging failures.
pub(crate) fn geometry_from(
    decoded: Result<Vec<Coordinate>, DecodeError>,
    provider: ProviderKind,
    index: usize,
) -> Option<LineString> {
    match decoded {
        Ok(points) => {
            let line = LineString::from_points(points);
            if line.is_none() {
                warn!(provider = %provider, index, "Geometry has fewer than two points");
            }
            line
        }
        Err(e) => {
            warn!(provider = %provider, index, error = %e, "Failed to decode geometry");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_mapbox_two_routes() {
        let raw = RawRoute::new(
            ProviderKind::Mapbox,
            json!({
                "routes": [
                    {"distance": 1200.5, "duration": 300.0, "geometry": "_izlhA~rlgdF_{geC~ywl@"},
                    {"distance": 1500.0, "duration": 360.0, "geometry": "_izlhA~rlgdF_{geC~ywl@"}
                ]
            }),
        );

        let drafts = normalize(&raw, 1_700_000_000);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].timestamp, 1_700_000_000);
        assert!((drafts[0].distance_meters - 1200.5).abs() < f64::EPSILON);
        let wkt = drafts[0].geometry.as_ref().unwrap().to_wkt();
        assert!(wkt.starts_with("LINESTRING (-120.2 38.5"), "{wkt}");
    }

    #[test]
    fn test_bad_geometry_keeps_route() {
        let raw = RawRoute::new(
            ProviderKind::Mapbox,
            json!({"routes": [{"distance": 10.0, "duration": 5.0, "geometry": "?"}]}),
        );

        let drafts = normalize(&raw, 0);
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].geometry.is_none());
        assert!((drafts[0].duration_seconds - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_routes_is_empty() {
        let raw = RawRoute::new(ProviderKind::TomTom, json!({"error": "nope"}));
        assert!(normalize(&raw, 0).is_empty());
    }

    #[test]
    fn test_geometry_needs_two_points() {
        let one = vec![Coordinate { lat: 1.0, lon: 2.0 }];
        assert!(geometry_from(Ok(one), ProviderKind::Here, 0).is_none());
    }
}
