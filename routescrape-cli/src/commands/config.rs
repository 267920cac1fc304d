//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use routescrape_core::ProviderKind;
use routescrape_store::{SettingsStore, default_config_dir};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration and data paths.
    Path,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
        ConfigAction::Reset => reset_config().await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            let paths = settings.data_paths(cli.data_dir.as_deref());
            println!("RouteScrape Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Daily limits:");
            for kind in ProviderKind::all() {
                println!("  • {:<8} {}", kind.display_name(), settings.daily_limit(*kind));
            }
            println!();
            println!(
                "Pacing:           {} - {} ms",
                settings.pacing_min_ms, settings.pacing_max_ms
            );
            println!("Request timeout:  {} s", settings.request_timeout_secs);
            println!("Alternatives:     {}", settings.max_alternatives);
            println!("Data dir:         {}", paths.data_dir.display());
            println!("Place catalog:    {}", paths.places_file.display());
            if let Err(e) = settings.validate() {
                println!();
                println!("Warning: {e}");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;
    let paths = store.get().await.data_paths(cli.data_dir.as_deref());

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", default_config_dir().display());
            println!("Settings file: {}", store.path().display());
            println!("Data dir:      {}", paths.data_dir.display());
            println!("Quota file:    {}", paths.quota_file.display());
            println!("Trip counter:  {}", paths.trip_counter_file.display());
            println!("Trips CSV:     {}", paths.trips_csv.display());
            println!("Place catalog: {}", paths.places_file.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "config_dir": default_config_dir().display().to_string(),
                "settings_file": store.path().display().to_string(),
                "data": paths,
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}

async fn reset_config() -> Result<()> {
    let store = SettingsStore::load_default().await;
    store.reset().await?;

    info!(path = %store.path().display(), "Settings reset");
    println!("Configuration reset to defaults");

    Ok(())
}
