// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! RouteScrape CLI - quota-aware route scraping from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Scrape 20 random routes from Mapbox
//! routescrape scrape --provider mapbox --num-route 20
//!
//! # Remaining requests for today
//! routescrape quota
//!
//! # JSON output
//! routescrape quota --format json --pretty
//!
//! # Look up a place in the catalog
//! routescrape place "ben thanh"
//!
//! # Trip dataset statistics
//! routescrape ledger
//! ```

mod commands;
mod output;
mod scrape;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use routescrape_core::CoreError;
use routescrape_fetch::ProviderError;
use routescrape_store::StoreError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, ledger, place, providers, quota};
use scrape::ScrapeError;

// ============================================================================
// CLI Definition
// ============================================================================

/// RouteScrape CLI - quota-aware route scraping.
#[derive(Parser)]
#[command(name = "routescrape")]
#[command(about = "Quota-aware route scraper for Mapbox, TomTom and HERE")]
#[command(long_about = r#"
RouteScrape requests driving routes between places from a catalog and
appends every returned route to a CSV trip dataset, without ever spending
more than the daily request allowance of a provider.

Supported providers:
  • Mapbox (mapbox, mb)       MAPBOX_API_KEY
  • TomTom (tomtom, tt)       TOMTOM_API_KEY
  • HERE (here, herev8)       HERE_API_KEY

Examples:
  routescrape scrape --provider here --num-route 5
  routescrape quota --provider tomtom
  routescrape ledger --format json
"#)]
#[command(version)]
#[command(author = "RouteScrape Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Data directory holding quota, counter and trip files.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Request routes and append them to the trip dataset.
    #[command(visible_alias = "s")]
    Scrape(commands::scrape::ScrapeArgs),

    /// Show remaining requests per provider for today.
    #[command(visible_alias = "q")]
    Quota(quota::QuotaArgs),

    /// List supported providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Look up a place in the catalog.
    Place(place::PlaceArgs),

    /// Show trip dataset statistics.
    #[command(visible_alias = "l")]
    Ledger,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error, including quota exhaustion.
    Error = 1,
    /// Missing credential, unknown provider or unusable configuration.
    Config = 2,
}

impl ExitCode {
    /// Exit code for a failed command.
    ///
    /// Unimplemented features are reported but do not fail the process.
    fn for_error(error: &anyhow::Error) -> Self {
        if let Some(e) = error.downcast_ref::<ScrapeError>() {
            return match e {
                ScrapeError::QuotaExhausted { .. } => Self::Error,
                ScrapeError::NotImplemented(_) => Self::Success,
                ScrapeError::Source(_) => Self::Config,
            };
        }
        if let Some(e) = error.downcast_ref::<CoreError>() {
            return if e.is_not_implemented() {
                Self::Success
            } else {
                Self::Config
            };
        }
        if error
            .downcast_ref::<ProviderError>()
            .is_some_and(ProviderError::is_configuration)
            || error
                .downcast_ref::<StoreError>()
                .is_some_and(StoreError::is_configuration)
        {
            return Self::Config;
        }
        Self::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("routescrape=debug,info")
    } else {
        EnvFilter::new("routescrape=info,warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Scrape(args) => commands::scrape::run(args, &cli).await,
        Commands::Quota(args) => quota::run(args, &cli).await,
        Commands::Providers => providers::run(&cli),
        Commands::Place(args) => place::run(args, &cli).await,
        Commands::Ledger => ledger::run(&cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        let code = ExitCode::for_error(&e);
        if !cli.quiet {
            match code {
                ExitCode::Success => eprintln!("Not available: {e}"),
                _ => eprintln!("Error: {e}"),
            }
        }
        std::process::exit(code as i32);
    }

    Ok(())
}
