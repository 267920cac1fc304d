//! Geometry types.
//!
//! - [`Coordinate`] - A WGS84 latitude/longitude pair
//! - [`OdPair`] - Origin and destination of a requested route
//! - [`LineString`] - An ordered path of at least two coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Coordinate
// ============================================================================

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        let coord = Self { lat, lon };
        coord.validate()?;
        Ok(coord)
    }

    /// Builds a coordinate from a `[lat, lon]` slice.
    pub fn from_slice(values: &[f64]) -> Result<Self, CoreError> {
        match values {
            [lat, lon] => Self::new(*lat, *lon),
            _ => Err(CoreError::InvalidCoordinates(format!(
                "expected [lat, lon], got {} values",
                values.len()
            ))),
        }
    }

    /// Checks that both components are finite and within WGS84 bounds.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(CoreError::InvalidCoordinates(format!(
                "non-numeric coordinate ({}, {})",
                self.lat, self.lon
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoreError::InvalidCoordinates(format!(
                "latitude {} out of range",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(CoreError::InvalidCoordinates(format!(
                "longitude {} out of range",
                self.lon
            )));
        }
        Ok(())
    }
}

impl FromStr for Coordinate {
    type Err = CoreError;

    /// Parses `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    CoreError::InvalidCoordinates(format!("'{}' is not a number", part.trim()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_slice(&values)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

// ============================================================================
// Origin / Destination Pair
// ============================================================================

/// The two endpoints of a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdPair {
    /// Where the route starts.
    pub origin: Coordinate,
    /// Where the route ends.
    pub destination: Coordinate,
}

impl OdPair {
    /// Creates a pair from two coordinates.
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Builds a pair from two `[lat, lon]` slices.
    pub fn from_slices(origin: &[f64], destination: &[f64]) -> Result<Self, CoreError> {
        Ok(Self::new(
            Coordinate::from_slice(origin)?,
            Coordinate::from_slice(destination)?,
        ))
    }

    /// Validates both endpoints.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.origin.validate()?;
        self.destination.validate()
    }
}

// ============================================================================
// Line String
// ============================================================================

/// An ordered route path.
///
/// Always holds at least two points. Renders as WKT with `lon lat` ordering:
/// `LINESTRING (106.65 10.8, 106.7 10.77)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString(Vec<Coordinate>);

impl LineString {
    /// Wraps decoded points, or returns `None` when fewer than two are given.
    pub fn from_points(points: Vec<Coordinate>) -> Option<Self> {
        if points.len() < 2 {
            None
        } else {
            Some(Self(points))
        }
    }

    /// Returns the points in path order.
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// Number of points in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a line string never has fewer than two points.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the WKT text form.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LINESTRING (")?;
        for (i, point) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", point.lon, point.lat)?;
        }
        f.write_str(")")
    }
}
