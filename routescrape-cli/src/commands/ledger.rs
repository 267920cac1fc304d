//! Ledger command - trip dataset statistics.

use anyhow::Result;
use routescrape_store::TripLedger;

use super::load_settings;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the ledger command.
pub async fn run(cli: &Cli) -> Result<()> {
    let (_, paths) = load_settings(cli).await?;
    let ledger = TripLedger::open(&paths.trips_csv, &paths.trip_counter_file).await?;
    let stats = ledger.stats().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_ledger(&stats, ledger.csv_path()));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_ledger(&stats, ledger.csv_path())?);
        }
    }

    Ok(())
}
