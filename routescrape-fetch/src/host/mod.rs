//! Host APIs for RouteScrape provider clients.
//!
//! This module provides abstractions for interacting with external systems:
//!
//! - [`http`] - HTTP transport with tracing and domain allowlist
//! - [`credentials`] - API key lookup

pub mod credentials;
pub mod http;

// Re-export key types
pub use credentials::{CredentialSource, EnvCredentials, StaticCredentials};
pub use http::{HttpClient, HttpResponse, Transport};
