// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # RouteScrape Fetch
//!
//! Host APIs and the provider seam for the RouteScrape workspace.
//!
//! This crate sits between the pure domain types of `routescrape-core` and
//! the concrete provider clients. It includes:
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for system interactions:
//!
//! - [`host::http`] - HTTP transport with tracing and a domain allowlist
//! - [`host::credentials`] - API key lookup (process environment)
//!
//! ## Provider Seam
//!
//! - [`provider::RouteProvider`] - Trait every routing provider implements
//! - [`quota::QuotaTracker`] - Daily quota bookkeeping used by providers
//! - [`context::FetchContext`] - Bundles the host APIs for providers
//!
//! ## Example
//!
//! ```ignore
//! use routescrape_fetch::FetchContext;
//!
//! let ctx = FetchContext::builder()
//!     .quota(Arc::new(quota_store.into_shared()))
//!     .build();
//!
//! let client = MapboxClient::new(&ctx)?;
//! let raw = client.fetch_route(&pair, &RouteOptions::default()).await?;
//! ```

// Core modules
pub mod context;
pub mod error;
pub mod host;
pub mod provider;
pub mod quota;

// Re-export key types at crate root

// Errors
pub use error::{HttpError, ProviderError};

// Host APIs
pub use host::{
    credentials::{CredentialSource, EnvCredentials, StaticCredentials},
    http::{HttpClient, HttpResponse, Transport},
};

// Provider seam
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use provider::{RawRoute, RouteOptions, RouteProvider};
pub use quota::{QuotaTracker, UntrackedQuota};
