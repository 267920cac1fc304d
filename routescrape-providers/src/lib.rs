// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # RouteScrape Providers
//!
//! Provider-specific implementations for RouteScrape.
//!
//! Each provider module includes:
//!
//! - **Client**: Builds the request and implements [`routescrape_fetch::RouteProvider`]
//! - **Parser**: Extracts routes from the provider's JSON
//! - **Descriptor**: Static configuration tying the two together
//!
//! ## Supported Providers
//!
//! | Provider | Endpoint | Geometry | Key variable |
//! |----------|----------|----------|--------------|
//! | Mapbox | Directions v5 | polyline6 | `MAPBOX_API_KEY` |
//! | TomTom | Routing v1 | polyline5 | `TOMTOM_API_KEY` |
//! | HERE | Routing v8 | flexible polyline | `HERE_API_KEY` |
//!
//! ## Usage
//!
//! ```ignore
//! use routescrape_providers::{ProviderRegistry, normalizer};
//! use routescrape_core::ProviderKind;
//!
//! let client = ProviderRegistry::client(ProviderKind::Mapbox, &ctx)?;
//! let raw = client.fetch_route(&pair, &ctx.settings.route_options()).await?;
//! let drafts = normalizer::normalize_now(&raw);
//! ```

pub mod descriptor;
pub mod normalizer;
pub mod registry;
mod request;

// Provider modules (alphabetical)
pub mod here;
pub mod mapbox;
pub mod tomtom;

// Re-export key types
pub use descriptor::{CliConfig, GeometryFormat, ProviderDescriptor, ProviderMetadata};
pub use normalizer::{ParsedRoute, normalize, normalize_now};
pub use registry::ProviderRegistry;

// Re-export provider descriptors and clients
pub use here::{HereClient, here_descriptor};
pub use mapbox::{MapboxClient, mapbox_descriptor};
pub use tomtom::{TomTomClient, tomtom_descriptor};
