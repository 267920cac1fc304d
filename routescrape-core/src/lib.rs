// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `RouteScrape` Core
//!
//! Core types, models, and the polyline codec for the `RouteScrape` workspace.
//!
//! This crate provides the foundational abstractions used across all other
//! `RouteScrape` crates, including:
//!
//! - Domain models (providers, coordinates, trips, quotas)
//! - Error types
//! - The polyline codec used to decode provider geometries
//! - The origin/destination source trait
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderKind`] - Enum of all supported routing providers
//!
//! ### Geometry Types
//! - [`Coordinate`] - A latitude/longitude pair
//! - [`OdPair`] - Origin and destination of a requested route
//! - [`LineString`] - Decoded route geometry
//!
//! ### Trip Types
//! - [`TripDraft`] - A normalized route that has not been assigned an id yet
//! - [`TripRecord`] - A normalized route ready for the trip ledger
//!
//! ### Quota Types
//! - [`QuotaRecord`] - Daily request allowance for one provider
//!
//! ### Scrape Types
//! - [`ScrapeMode`] - How origin/destination pairs are chosen
//! - [`RouteCount`] - How many routes a run should scrape

pub mod error;
pub mod models;
pub mod polyline;
pub mod traits;

// Re-export error types
pub use error::CoreError;
pub use polyline::DecodeError;

// Re-export all model types
pub use models::{
    // Provider types
    ProviderKind,
    // Geometry types
    Coordinate,
    LineString,
    OdPair,
    // Trip types
    TRIP_CSV_HEADER,
    TripDraft,
    TripRecord,
    // Quota types
    QuotaRecord,
    // Scrape types
    RouteCount,
    ScrapeMode,
};

// Re-export traits
pub use traits::{FixedOdSource, OdSource};
