//! Domain models for RouteScrape.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider types (ProviderKind)
//! - [`geo`] - Coordinates, OD pairs and line strings
//! - [`trip`] - Trip drafts and records
//! - [`quota`] - Daily quota bookkeeping
//! - [`scrape`] - Scrape modes and route counts

mod geo;
mod provider;
mod quota;
mod scrape;
mod trip;

// Re-export everything at the models level
pub use geo::{Coordinate, LineString, OdPair};
pub use provider::ProviderKind;
pub use quota::QuotaRecord;
pub use scrape::{RouteCount, ScrapeMode};
pub use trip::{TRIP_CSV_HEADER, TripDraft, TripRecord};
