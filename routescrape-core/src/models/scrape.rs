//! Scrape run parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Scrape Mode
// ============================================================================

/// How origin/destination pairs are chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeMode {
    /// Two distinct random places from the place catalog.
    RandomOdPlace,
    /// Random points on road segments. Not built yet.
    RandomOdSeg,
    /// Pairs listed in an input file. Not built yet.
    Specific,
}

impl ScrapeMode {
    /// Returns all scrape modes.
    pub fn all() -> &'static [ScrapeMode] {
        &[Self::RandomOdPlace, Self::RandomOdSeg, Self::Specific]
    }

    /// Name used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::RandomOdPlace => "random_od_place",
            Self::RandomOdSeg => "random_od_seg",
            Self::Specific => "specific",
        }
    }

    /// Fails with [`CoreError::NotImplemented`] for modes without a source.
    pub fn ensure_implemented(&self) -> Result<(), CoreError> {
        match self {
            Self::RandomOdPlace => Ok(()),
            Self::RandomOdSeg | Self::Specific => Err(CoreError::NotImplemented(format!(
                "scrape mode '{}'",
                self.cli_name()
            ))),
        }
    }
}

impl fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ScrapeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|mode| mode.cli_name() == s.trim())
            .ok_or_else(|| CoreError::InvalidConfig(format!("unknown scrape mode '{s}'")))
    }
}

// ============================================================================
// Route Count
// ============================================================================

/// How many routes a run should scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCount {
    /// A fixed number of requests.
    Count(u32),
    /// Follow daily time slots indefinitely. Not built yet.
    Schedule,
}

impl fmt::Display for RouteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Schedule => f.write_str("schedule"),
        }
    }
}

impl FromStr for RouteCount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("schedule") {
            return Ok(Self::Schedule);
        }
        s.parse::<u32>().map(Self::Count).map_err(|_| {
            CoreError::InvalidConfig(format!(
                "route count must be an integer or 'schedule', got '{s}'"
            ))
        })
    }
}
