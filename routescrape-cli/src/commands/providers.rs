//! Providers command - list supported providers.

use anyhow::Result;
use routescrape_fetch::{CredentialSource, EnvCredentials};
use routescrape_providers::ProviderRegistry;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub fn run(cli: &Cli) -> Result<()> {
    info!("Listing providers");

    let providers = ProviderRegistry::all();
    let credentials = EnvCredentials::new();
    let configured: Vec<bool> = providers
        .iter()
        .map(|desc| credentials.api_key(desc.id).is_some())
        .collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(78));

            for (desc, has_key) in providers.iter().zip(&configured) {
                println!("{}", formatter.format_provider_line(desc, *has_key));
            }

            println!();
            println!(
                "Total: {} providers ({} with an API key)",
                providers.len(),
                configured.iter().filter(|c| **c).count()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(providers, &configured)?);
        }
    }

    Ok(())
}
