//! Provider descriptor system.
//!
//! A descriptor contains all the static configuration for a provider:
//! - Metadata (display name, endpoint, geometry format)
//! - The client constructor
//! - The response parser used by the normalizer
//! - CLI configuration

use std::fmt;

use routescrape_core::ProviderKind;
use routescrape_fetch::{FetchContext, ProviderError, RouteProvider};
use serde::Serialize;
use serde_json::Value;

use crate::normalizer::ParsedRoute;

/// Extracts routes from a provider response body.
pub type ParseFn = fn(&Value) -> Vec<ParsedRoute>;

/// Builds a client from the fetch context.
pub type BuildClientFn = fn(&FetchContext) -> Result<Box<dyn RouteProvider>, ProviderError>;

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Complete descriptor for a provider.
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Display metadata.
    pub metadata: ProviderMetadata,
    /// Client constructor.
    pub build_client: BuildClientFn,
    /// Response parser.
    pub parser: ParseFn,
    /// CLI naming.
    pub cli: CliConfig,
}

impl ProviderDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        self.metadata.display_name
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &str {
        self.cli.name
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(&self) -> &'static str {
        self.id.api_key_env()
    }

    /// Default requests per day.
    pub fn default_daily_limit(&self) -> u32 {
        self.id.default_daily_limit()
    }

    /// Creates a client for this provider.
    pub fn build_client(&self, ctx: &FetchContext) -> Result<Box<dyn RouteProvider>, ProviderError> {
        (self.build_client)(ctx)
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .field("cli", &self.cli)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Static facts about a provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    /// Human readable name.
    pub display_name: &'static str,
    /// Routing endpoint (path parameters omitted).
    pub endpoint: &'static str,
    /// Public API documentation.
    pub docs_url: &'static str,
    /// Encoding of route geometry.
    pub geometry: GeometryFormat,
}

/// Route geometry encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryFormat {
    /// Google polyline, 5 decimal places.
    Polyline5,
    /// Google polyline, 6 decimal places.
    Polyline6,
    /// HERE flexible polyline.
    Flexible,
}

impl GeometryFormat {
    /// Short label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Polyline5 => "polyline5",
            Self::Polyline6 => "polyline6",
            Self::Flexible => "flexible polyline",
        }
    }
}

impl fmt::Display for GeometryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// CLI Config
// ============================================================================

/// Names a provider answers to on the command line.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Primary name.
    pub name: &'static str,
    /// Alternative names.
    pub aliases: &'static [&'static str],
}
