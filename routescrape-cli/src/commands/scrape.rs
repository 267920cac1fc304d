//! Scrape command - request routes and grow the trip dataset.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use routescrape_core::{CoreError, OdSource, RouteCount, ScrapeMode};
use routescrape_fetch::FetchContext;
use routescrape_providers::ProviderRegistry;
use routescrape_store::{PlaceCatalog, QuotaStore, RandomPlaceSource, TripLedger};
use tracing::info;

use super::load_settings;
use crate::output::{JsonFormatter, TextFormatter};
use crate::scrape::{Pacing, ScrapeError, Scraper};
use crate::{Cli, OutputFormat};

/// Arguments for the scrape command.
#[derive(Args)]
pub struct ScrapeArgs {
    /// Provider to request routes from: mapbox, tomtom or here.
    #[arg(long, short)]
    pub provider: String,

    /// How origin/destination pairs are chosen:
    /// random_od_place, random_od_seg or specific.
    #[arg(long, short, default_value = "random_od_place")]
    pub mode: ScrapeMode,

    /// Number of requests to issue, or "schedule".
    #[arg(long, short = 'n', default_value = "schedule")]
    pub num_route: RouteCount,
}

/// Runs the scrape command.
pub async fn run(args: &ScrapeArgs, cli: &Cli) -> Result<()> {
    let desc = ProviderRegistry::get_by_cli_name(&args.provider)
        .ok_or_else(|| CoreError::ProviderNotFound(args.provider.clone()))?;
    args.mode.ensure_implemented()?;
    if args.num_route == RouteCount::Schedule {
        return Err(ScrapeError::NotImplemented("scheduled scraping".to_string()).into());
    }

    let (settings, paths) = load_settings(cli).await?;
    info!(
        provider = %desc.id,
        mode = %args.mode,
        count = %args.num_route,
        "Scrape requested"
    );

    let quota = QuotaStore::open(&paths.quota_file, settings.daily_limits.clone())
        .await
        .into_shared();
    let ctx = FetchContext::builder()
        .quota(Arc::new(quota))
        .timeout(settings.request_timeout())
        .max_alternatives(settings.max_alternatives)
        .build()?;
    let provider = desc.build_client(&ctx)?;

    let source = od_source(args.mode, &paths.places_file).await?;
    let ledger = TripLedger::open(&paths.trips_csv, &paths.trip_counter_file).await?;
    let (min, max) = settings.pacing();

    let mut scraper = Scraper::new(provider, source, ledger)
        .with_options(ctx.settings.route_options())
        .with_pacing(Pacing::new(min, max));
    let report = scraper.run(args.num_route).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_report(&report, &paths.trips_csv));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(&report, &paths.trips_csv)?);
        }
    }

    Ok(())
}

/// Builds the pair source for a mode.
async fn od_source(mode: ScrapeMode, places_file: &Path) -> Result<Box<dyn OdSource>> {
    match mode {
        ScrapeMode::RandomOdPlace => {
            let catalog = PlaceCatalog::load(places_file).await?;
            Ok(Box::new(RandomPlaceSource::new(catalog)))
        }
        ScrapeMode::RandomOdSeg | ScrapeMode::Specific => Err(CoreError::NotImplemented(
            format!("scrape mode '{mode}'"),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> (ScrapeArgs, Cli) {
        let cli = Cli::try_parse_from(args).unwrap();
        let crate::Commands::Scrape(scrape) = &cli.command else {
            panic!("expected scrape");
        };
        let scrape = ScrapeArgs {
            provider: scrape.provider.clone(),
            mode: scrape.mode,
            num_route: scrape.num_route,
        };
        (scrape, cli)
    }

    #[tokio::test]
    async fn test_schedule_stops_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let data_arg = data_dir.display().to_string();
        let (args, cli) = parse(&[
            "routescrape",
            "scrape",
            "--provider",
            "mapbox",
            "--data-dir",
            &data_arg,
        ]);
        assert_eq!(args.num_route, RouteCount::Schedule);

        let err = run(&args, &cli).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::NotImplemented(_))
        ));
        assert!(!data_dir.exists());
    }

    #[tokio::test]
    async fn test_unbuilt_mode_checked_before_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let data_arg = dir.path().display().to_string();
        let (args, cli) = parse(&[
            "routescrape",
            "scrape",
            "-p",
            "here",
            "--mode",
            "specific",
            "--data-dir",
            &data_arg,
        ]);

        let err = run(&args, &cli).await.unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some_and(CoreError::is_not_implemented));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unbuilt_modes_have_no_source() {
        let dir = tempfile::tempdir().unwrap();
        let places = dir.path().join("place.csv");

        for mode in [ScrapeMode::RandomOdSeg, ScrapeMode::Specific] {
            let err = od_source(mode, &places).await.err().unwrap();
            let core = err.downcast_ref::<CoreError>().unwrap();
            assert!(core.is_not_implemented());
        }
    }

    #[tokio::test]
    async fn test_random_source_needs_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let places = dir.path().join("place.csv");

        let err = od_source(ScrapeMode::RandomOdPlace, &places).await.err().unwrap();
        assert!(err.downcast_ref::<routescrape_store::StoreError>().is_some());

        tokio::fs::write(&places, "name,lat,lon\nA,10.1,106.1\nB,10.2,106.2\n")
            .await
            .unwrap();
        let mut source = od_source(ScrapeMode::RandomOdPlace, &places).await.unwrap();
        assert_eq!(source.name(), "random_od_place");
        assert!(source.next_pair().is_ok());
    }
}
