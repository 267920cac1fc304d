//! TomTom provider implementation.
//!
//! TomTom Routing API v1 `calculateRoute`. The key is read from
//! `TOMTOM_API_KEY`; geometry comes back as a precision-5 polyline per leg.

mod client;
mod descriptor;
pub(crate) mod parser;

pub use client::TomTomClient;
pub use descriptor::tomtom_descriptor;
pub use parser::parse_tomtom_routes;
