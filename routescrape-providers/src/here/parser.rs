//! HERE response parser.
//!
//! A HERE route is a list of sections. Distances and durations are summed;
//! section polylines are joined, dropping the point shared by consecutive
//! sections.

use routescrape_core::{Coordinate, DecodeError, ProviderKind, polyline};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::normalizer::{ParsedRoute, geometry_from, read_entry, route_entries};

#[derive(Debug, Deserialize)]
struct HereRoute {
    #[serde(default)]
    sections: Vec<HereSection>,
}

#[derive(Debug, Deserialize)]
struct HereSection {
    #[serde(default)]
    polyline: Option<String>,
    #[serde(default)]
    summary: HereSummary,
}

#[derive(Debug, Default, Deserialize)]
struct HereSummary {
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
}

/// Extracts `routes[]` from a v8 routes response.
pub fn parse_here_routes(body: &Value) -> Vec<ParsedRoute> {
    let kind = ProviderKind::Here;
    let entries = route_entries(body, kind);
    debug!(count = entries.len(), "Parsing HERE routes");

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let route: HereRoute = read_entry(entry, kind, index)?;
            let distance: f64 = route
                .sections
                .iter()
                .filter_map(|s| s.summary.length)
                .sum();
            let duration: f64 = route
                .sections
                .iter()
                .filter_map(|s| s.summary.duration)
                .sum();
            let geometry = join_sections(&route.sections)
                .and_then(|decoded| geometry_from(decoded, kind, index));
            Some(ParsedRoute {
                distance_meters: distance,
                duration_seconds: duration,
                geometry,
            })
        })
        .collect()
}

/// Decodes and concatenates section polylines.
///
/// Returns `None` when no section carries a polyline.
fn join_sections(sections: &[HereSection]) -> Option<Result<Vec<Coordinate>, DecodeError>> {
    let encoded: Vec<&str> = sections
        .iter()
        .filter_map(|s| s.polyline.as_deref())
        .filter(|p| !p.is_empty())
        .collect();
    if encoded.is_empty() {
        return None;
    }

    let mut points: Vec<Coordinate> = Vec::new();
    for section in encoded {
        let decoded = match polyline::decode_flexible(section) {
            Ok(decoded) => decoded,
            Err(e) => return Some(Err(e)),
        };
        let mut iter = decoded.into_iter().peekable();
        if let (Some(last), Some(first)) = (points.last(), iter.peek()) {
            if last == first {
                iter.next();
            }
        }
        points.extend(iter);
    }
    Some(Ok(points))
}
