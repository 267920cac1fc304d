// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # RouteScrape Store
//!
//! Durable state for RouteScrape.
//!
//! This crate provides:
//!
//! - **QuotaStore**: Daily request allowance per provider, written through on every change
//! - **TripLedger**: Trip id allocation and the append-only trip CSV
//! - **PlaceCatalog**: Named places used to build origin/destination pairs
//! - **SettingsStore**: User preferences with persistence
//! - **Persistence**: Atomic JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use routescrape_store::{QuotaStore, SettingsStore, TripLedger};
//!
//! let settings = SettingsStore::load_default().await.get().await;
//! let paths = settings.data_paths(None);
//!
//! let quota = QuotaStore::open(&paths.quota_file, settings.daily_limits.clone()).await;
//! let mut ledger = TripLedger::open(&paths.trips_csv, &paths.trip_counter_file).await?;
//!
//! let id = ledger.next_trip_id().await?;
//! ledger.append(&draft.with_id(id)).await?;
//! ```

pub mod error;
pub mod persistence;
pub mod place_catalog;
pub mod quota_store;
pub mod settings_store;
pub mod trip_ledger;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_data_dir, default_settings_path, load_json, load_json_or_default,
    save_json,
};
pub use place_catalog::{Place, PlaceCatalog, RandomPlaceSource};
pub use quota_store::{DailyLimits, QuotaFile, QuotaStore, SharedQuotaStore};
pub use settings_store::{DataPaths, Settings, SettingsStore};
pub use trip_ledger::{LedgerStats, TripLedger};
#[cfg(test)]
mod persistence_tests;
