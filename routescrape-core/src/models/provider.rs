//! Provider-related types.
//!
//! [`ProviderKind`] identifies one of the supported routing providers and
//! carries the static facts every layer needs: names, the environment
//! variable holding its credential, and its default daily request cap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported routing provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Mapbox Directions API
    Mapbox,
    /// TomTom Routing API
    TomTom,
    /// HERE Routing API v8
    Here,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mapbox => "Mapbox",
            Self::TomTom => "TomTom",
            Self::Here => "HERE",
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Mapbox, Self::TomTom, Self::Here]
    }

    /// Returns the CLI name for this provider (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Mapbox => "mapbox",
            Self::TomTom => "tomtom",
            Self::Here => "here",
        }
    }

    /// Environment variable that holds the API credential.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Mapbox => "MAPBOX_API_KEY",
            Self::TomTom => "TOMTOM_API_KEY",
            Self::Here => "HERE_API_KEY",
        }
    }

    /// Default number of requests allowed per calendar day.
    pub fn default_daily_limit(&self) -> u32 {
        match self {
            Self::Mapbox => 3000,
            Self::TomTom => 2000,
            Self::Here => 1000,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.cli_name() == name)
            .ok_or_else(|| CoreError::ProviderNotFound(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Mapbox".parse::<ProviderKind>().unwrap(), ProviderKind::Mapbox);
        assert_eq!(" tomtom ".parse::<ProviderKind>().unwrap(), ProviderKind::TomTom);
        assert_eq!("HERE".parse::<ProviderKind>().unwrap(), ProviderKind::Here);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "google".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, CoreError::ProviderNotFound(_)));
    }

    #[test]
    fn test_default_limits() {
        assert_eq!(ProviderKind::Mapbox.default_daily_limit(), 3000);
        assert_eq!(ProviderKind::TomTom.default_daily_limit(), 2000);
        assert!(ProviderKind::Here.default_daily_limit() > 0);
    }
}
