//! HERE provider implementation.
//!
//! HERE Routing API v8. The key is read from `HERE_API_KEY`; each route is
//! split into sections whose geometry is a flexible polyline.

mod client;
mod descriptor;
pub(crate) mod parser;

pub use client::HereClient;
pub use descriptor::here_descriptor;
pub use parser::parse_here_routes;
