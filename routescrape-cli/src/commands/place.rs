//! Place command - look up a place in the catalog.

use anyhow::Result;
use clap::Args;
use routescrape_store::PlaceCatalog;

use super::load_settings;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the place command.
#[derive(Args)]
pub struct PlaceArgs {
    /// Part of the place name, case-insensitive.
    pub keyword: String,
}

/// Runs the place command.
pub async fn run(args: &PlaceArgs, cli: &Cli) -> Result<()> {
    let (_, paths) = load_settings(cli).await?;
    let catalog = PlaceCatalog::load(&paths.places_file).await?;
    let place = catalog.find(&args.keyword);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_place(&args.keyword, place));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&place)?);
        }
    }

    Ok(())
}
