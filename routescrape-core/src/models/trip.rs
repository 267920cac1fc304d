//! Trip types.
//!
//! A provider response is normalized into one [`TripDraft`] per returned
//! route. The trip ledger assigns each draft a unique id, producing a
//! [`TripRecord`] that is appended to the dataset exactly once.

use serde::{Deserialize, Serialize};

use super::geo::LineString;

/// Column names of the trip dataset, in file order.
pub const TRIP_CSV_HEADER: [&str; 5] = ["trip_id", "timestamp", "distance", "duration", "geometry"];

// ============================================================================
// Trip Draft
// ============================================================================

/// A normalized route that has not been assigned a trip id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDraft {
    /// Capture time, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Route length in meters.
    pub distance_meters: f64,
    /// Travel time in seconds.
    pub duration_seconds: f64,
    /// Decoded path, `None` when the provider geometry could not be decoded.
    pub geometry: Option<LineString>,
}

impl TripDraft {
    /// Creates a draft, clamping negative or non-finite measurements to zero.
    pub fn new(
        timestamp: i64,
        distance_meters: f64,
        duration_seconds: f64,
        geometry: Option<LineString>,
    ) -> Self {
        Self {
            timestamp,
            distance_meters: non_negative(distance_meters),
            duration_seconds: non_negative(duration_seconds),
            geometry,
        }
    }

    /// Attaches a trip id.
    pub fn with_id(self, trip_id: u64) -> TripRecord {
        TripRecord {
            trip_id,
            timestamp: self.timestamp,
            distance_meters: self.distance_meters,
            duration_seconds: self.duration_seconds,
            geometry: self.geometry,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ============================================================================
// Trip Record
// ============================================================================

/// One normalized route result, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique, strictly increasing trip id.
    pub trip_id: u64,
    /// Capture time, seconds since the Unix epoch.
    pub timestamp: i64,
    /// Route length in meters.
    pub distance_meters: f64,
    /// Travel time in seconds.
    pub duration_seconds: f64,
    /// Decoded path, `None` when the provider geometry could not be decoded.
    pub geometry: Option<LineString>,
}

impl TripRecord {
    /// Geometry column text: WKT, or an empty string when absent.
    pub fn geometry_text(&self) -> String {
        self.geometry
            .as_ref()
            .map(LineString::to_wkt)
            .unwrap_or_default()
    }

    /// Renders the record as dataset column values, in [`TRIP_CSV_HEADER`] order.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.trip_id.to_string(),
            self.timestamp.to_string(),
            self.distance_meters.to_string(),
            self.duration_seconds.to_string(),
            self.geometry_text(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    #[test]
    fn test_draft_clamps_negative_values() {
        let draft = TripDraft::new(0, -5.0, f64::NAN, None);
        assert_eq!(draft.distance_meters, 0.0);
        assert_eq!(draft.duration_seconds, 0.0);
    }

    #[test]
    fn test_row_with_empty_geometry() {
        let record = TripDraft::new(1_700_000_000, 1234.5, 300.0, None).with_id(7);
        assert_eq!(
            record.to_row(),
            [
                "7".to_string(),
                "1700000000".to_string(),
                "1234.5".to_string(),
                "300".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_row_with_geometry() {
        let line = LineString::from_points(vec![
            Coordinate { lat: 1.5, lon: 2.5 },
            Coordinate { lat: 3.0, lon: 4.0 },
        ]);
        let record = TripDraft::new(1, 2.0, 3.0, line).with_id(1);
        assert_eq!(record.geometry_text(), "LINESTRING (2.5 1.5, 4 3)");
    }
}
