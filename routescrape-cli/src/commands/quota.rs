//! Quota command - remaining requests per provider.

use anyhow::Result;
use clap::Args;
use routescrape_core::{CoreError, ProviderKind, QuotaRecord};
use routescrape_providers::ProviderRegistry;
use routescrape_store::QuotaStore;
use tracing::info;

use super::load_settings;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the quota command.
#[derive(Args)]
pub struct QuotaArgs {
    /// Only show this provider.
    #[arg(long, short)]
    pub provider: Option<String>,

    /// Refill the allowance now instead of waiting for tomorrow.
    #[arg(long, requires = "provider")]
    pub reset: bool,
}

/// Runs the quota command.
pub async fn run(args: &QuotaArgs, cli: &Cli) -> Result<()> {
    let kinds: Vec<ProviderKind> = match &args.provider {
        Some(name) => {
            let desc = ProviderRegistry::get_by_cli_name(name)
                .ok_or_else(|| CoreError::ProviderNotFound(name.clone()))?;
            vec![desc.id]
        }
        None => ProviderRegistry::kinds(),
    };

    let (settings, paths) = load_settings(cli).await?;
    let mut store = QuotaStore::open(&paths.quota_file, settings.daily_limits.clone()).await;

    if args.reset {
        for kind in &kinds {
            store.reset(*kind).await;
            info!(provider = %kind, "Quota refilled");
        }
    }

    let mut records: Vec<QuotaRecord> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        // Reading through the store applies a pending day rollover.
        store.remaining(kind).await;
        if let Some(record) = store.record(kind) {
            records.push(record.clone());
        }
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_quota(&records));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_quota(&records)?);
        }
    }

    Ok(())
}
