//! User preferences store.
//!
//! Settings live in `<config_dir>/routescrape/settings.json`. Every field has
//! a default, so a partial or missing file is fine.

use routescrape_core::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_data_dir, default_settings_path, load_json, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding quota, counter and trip files.
    pub data_dir: Option<PathBuf>,

    /// Place catalog CSV. Defaults to `place.csv` in the data directory.
    pub places_file: Option<PathBuf>,

    /// Daily request limits overriding the provider defaults.
    pub daily_limits: BTreeMap<ProviderKind, u32>,

    /// Shortest pause between scrape iterations, in milliseconds.
    pub pacing_min_ms: u64,

    /// Longest pause between scrape iterations, in milliseconds.
    pub pacing_max_ms: u64,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Alternative routes requested per call.
    pub max_alternatives: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            places_file: None,
            daily_limits: ProviderKind::all()
                .iter()
                .map(|k| (*k, k.default_daily_limit()))
                .collect(),
            pacing_min_ms: 500,
            pacing_max_ms: 1500,
            request_timeout_secs: 30,
            max_alternatives: 2,
        }
    }
}

impl Settings {
    /// Daily limit for a provider.
    pub fn daily_limit(&self, kind: ProviderKind) -> u32 {
        self.daily_limits
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_daily_limit())
    }

    /// Pacing bounds.
    pub fn pacing(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.pacing_min_ms),
            Duration::from_millis(self.pacing_max_ms),
        )
    }

    /// Request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.pacing_min_ms > self.pacing_max_ms {
            return Err(StoreError::Config(format!(
                "pacing_min_ms ({}) exceeds pacing_max_ms ({})",
                self.pacing_min_ms, self.pacing_max_ms
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(StoreError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if let Some((kind, _)) = self.daily_limits.iter().find(|(_, limit)| **limit == 0) {
            return Err(StoreError::Config(format!(
                "daily limit for {kind} must be positive"
            )));
        }
        Ok(())
    }

    /// Resolves file locations. `data_dir_override` wins over the setting.
    pub fn data_paths(&self, data_dir_override: Option<&Path>) -> DataPaths {
        let data_dir = data_dir_override
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(default_data_dir);
        let places_file = self
            .places_file
            .clone()
            .unwrap_or_else(|| data_dir.join(DataPaths::PLACES_FILE));
        DataPaths::new(data_dir, places_file)
    }
}

// ============================================================================
// Data Paths
// ============================================================================

/// Where the scraper keeps its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPaths {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Quota JSON file.
    pub quota_file: PathBuf,
    /// Trip counter JSON file.
    pub trip_counter_file: PathBuf,
    /// Trip dataset CSV.
    pub trips_csv: PathBuf,
    /// Place catalog CSV.
    pub places_file: PathBuf,
}

impl DataPaths {
    const PLACES_FILE: &'static str = "place.csv";

    /// Lays out the standard files under `data_dir`.
    pub fn new(data_dir: PathBuf, places_file: PathBuf) -> Self {
        Self {
            quota_file: data_dir.join("quota.json"),
            trip_counter_file: data_dir.join("trip_counter.json"),
            trips_csv: data_dir.join("trips.csv"),
            places_file,
            data_dir,
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path, falling back to defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Saves settings to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Restores defaults and saves them.
    pub async fn reset(&self) -> Result<(), StoreError> {
        *self.settings.write().await = Settings::default();
        self.save().await
    }
}

// ============================================================================
// Tests
// ============================================================================
