//! Mapbox provider implementation.
//!
//! Mapbox Directions API v5, `driving` profile. The key is read from
//! `MAPBOX_API_KEY`; route geometry is a precision-6 polyline.

mod client;
mod descriptor;
pub(crate) mod parser;

pub use client::MapboxClient;
pub use descriptor::mapbox_descriptor;
pub use parser::parse_mapbox_routes;
