//! JSON output formatting.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use routescrape_core::QuotaRecord;
use routescrape_providers::ProviderDescriptor;
use routescrape_store::LedgerStats;
use serde::{Serialize, Serializer};

use crate::scrape::ScrapeReport;

// ============================================================================
// Output Types
// ============================================================================

/// Quota of one provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaOutput {
    pub provider: String,
    pub remaining: u32,
    pub daily_limit: u32,
    pub used_percent: f64,
    #[serde(serialize_with = "serialize_date")]
    pub last_reset_date: NaiveDate,
}

/// Provider info output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfoOutput {
    pub id: String,
    pub display_name: String,
    pub cli_name: String,
    pub aliases: Vec<String>,
    pub endpoint: String,
    pub docs_url: String,
    pub geometry: String,
    pub api_key_env: String,
    pub api_key_configured: bool,
    pub default_daily_limit: u32,
}

/// Scrape run output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput<'a> {
    #[serde(flatten)]
    pub report: &'a ScrapeReport,
    pub trips_csv: String,
}

/// Trip dataset output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerOutput {
    pub path: String,
    pub rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_trip_id: Option<u64>,
    pub counter: u64,
    pub unreadable_rows: u64,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_date<S>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&date.format("%Y-%m-%d").to_string())
}

pub(crate) fn used_percent(record: &QuotaRecord) -> f64 {
    if record.daily_limit == 0 {
        return 100.0;
    }
    let used = record.daily_limit.saturating_sub(record.requests_remaining);
    f64::from(used) / f64::from(record.daily_limit) * 100.0
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats quota records.
    pub fn format_quota(&self, records: &[QuotaRecord]) -> Result<String> {
        let outputs: Vec<QuotaOutput> = records.iter().map(quota_to_output).collect();

        if outputs.len() == 1 {
            self.format(&outputs[0])
        } else {
            self.format(&outputs)
        }
    }

    /// Formats the provider list.
    pub fn format_providers(
        &self,
        providers: &[ProviderDescriptor],
        configured: &[bool],
    ) -> Result<String> {
        let outputs: Vec<ProviderInfoOutput> = providers
            .iter()
            .zip(configured)
            .map(|(desc, &has_key)| ProviderInfoOutput {
                id: desc.id.to_string(),
                display_name: desc.display_name().to_string(),
                cli_name: desc.cli_name().to_string(),
                aliases: desc.cli.aliases.iter().map(ToString::to_string).collect(),
                endpoint: desc.metadata.endpoint.to_string(),
                docs_url: desc.metadata.docs_url.to_string(),
                geometry: desc.metadata.geometry.label().to_string(),
                api_key_env: desc.api_key_env().to_string(),
                api_key_configured: has_key,
                default_daily_limit: desc.default_daily_limit(),
            })
            .collect();

        self.format(&outputs)
    }

    /// Formats a scrape report.
    pub fn format_report(&self, report: &ScrapeReport, trips_csv: &Path) -> Result<String> {
        self.format(&ReportOutput {
            report,
            trips_csv: trips_csv.display().to_string(),
        })
    }

    /// Formats trip dataset statistics.
    pub fn format_ledger(&self, stats: &LedgerStats, path: &Path) -> Result<String> {
        self.format(&LedgerOutput {
            path: path.display().to_string(),
            rows: stats.rows,
            highest_trip_id: stats.highest_trip_id,
            counter: stats.counter,
            unreadable_rows: stats.unreadable_rows,
        })
    }
}

fn quota_to_output(record: &QuotaRecord) -> QuotaOutput {
    QuotaOutput {
        provider: record.provider.to_string(),
        remaining: record.requests_remaining,
        daily_limit: record.daily_limit,
        used_percent: used_percent(record),
        last_reset_date: record.last_reset_date,
    }
}

// ============================================================================
// Tests
// ============================================================================
