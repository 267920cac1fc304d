//! CLI command implementations.

pub mod config;
pub mod ledger;
pub mod place;
pub mod providers;
pub mod quota;
pub mod scrape;

use anyhow::Result;
use routescrape_store::{DataPaths, Settings, SettingsStore};
use tracing::debug;

use crate::Cli;

/// Loads settings and resolves data paths, honoring `--data-dir`.
pub(crate) async fn load_settings(cli: &Cli) -> Result<(Settings, DataPaths)> {
    let settings = SettingsStore::load_default().await.get().await;
    settings.validate()?;
    let paths = settings.data_paths(cli.data_dir.as_deref());
    debug!(data_dir = %paths.data_dir.display(), "Data paths resolved");
    Ok((settings, paths))
}
