//! Text output formatting with progress bars and colors.

use std::path::Path;

use routescrape_core::QuotaRecord;
use routescrape_providers::{ProviderDescriptor, ProviderRegistry};
use routescrape_store::{LedgerStats, Place};

use super::json::used_percent;
use crate::scrape::ScrapeReport;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Set the progress bar width.
    #[cfg(test)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Formats remaining quota, one provider per line.
    pub fn format_quota(&self, records: &[QuotaRecord]) -> String {
        let mut lines = Vec::new();

        for record in records {
            let name = ProviderRegistry::get(record.provider)
                .map_or_else(|| record.provider.display_name(), |d| d.display_name());
            let remaining = 100.0 - used_percent(record);
            let bar = self.progress_bar(remaining);
            let count = self.color_for_percent(
                remaining,
                &format!("{} / {} left", record.requests_remaining, record.daily_limit),
            );

            lines.push(format!(
                "{:<8} {} {}  {}",
                name,
                bar,
                count,
                self.dim(&format!("since {}", record.last_reset_date))
            ));
        }

        lines.join("\n")
    }

    /// Formats a progress bar.
    pub fn progress_bar(&self, percent_remaining: f64) -> String {
        let ratio = (percent_remaining / 100.0).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = (ratio * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(percent_remaining, &bar)
    }

    /// Formats the result of a scrape run.
    pub fn format_report(&self, report: &ScrapeReport, trips_csv: &Path) -> String {
        let name = ProviderRegistry::get(report.provider)
            .map_or_else(|| report.provider.display_name(), |d| d.display_name());

        let mut lines = vec![
            format!("{} scrape finished", self.bold(name)),
            format!(
                "Requests: {} of {} succeeded",
                self.green(&report.succeeded_requests.to_string()),
                report.requested
            ),
        ];
        if report.failed_requests > 0 {
            lines.push(format!(
                "Failed:   {}",
                self.red(&report.failed_requests.to_string())
            ));
        }
        lines.push(format!("Trips:    {} written", report.trips_written));
        if report.write_failures > 0 {
            lines.push(format!(
                "Lost:     {} (ledger write failed)",
                self.yellow(&report.write_failures.to_string())
            ));
        }
        lines.push(format!("Dataset:  {}", self.cyan(&trips_csv.display().to_string())));

        lines.join("\n")
    }

    /// Formats the provider list header.
    pub fn format_providers_header(&self) -> String {
        format!(
            "{:<10} {:<16} {:<18} {:<16} {}",
            self.bold("Provider"),
            self.bold("Names"),
            self.bold("Geometry"),
            self.bold("Key variable"),
            self.bold("Daily limit")
        )
    }

    /// Formats a single provider line.
    pub fn format_provider_line(&self, desc: &ProviderDescriptor, has_key: bool) -> String {
        let status = if has_key {
            self.green("✓")
        } else {
            self.dim("−")
        };

        let mut names = vec![desc.cli_name()];
        names.extend(desc.cli.aliases.iter().copied());

        format!(
            "{:<10} {:<16} {:<18} {:<16} {}",
            format!("{} {}", desc.display_name(), status),
            names.join(", "),
            desc.metadata.geometry.label(),
            desc.api_key_env(),
            desc.default_daily_limit()
        )
    }

    /// Formats a place lookup.
    pub fn format_place(&self, keyword: &str, place: Option<&Place>) -> String {
        match place {
            Some(place) => format!(
                "{} ({})",
                self.bold(&place.name),
                self.cyan(&place.coordinate.to_string())
            ),
            None => format!("No place matches '{keyword}'"),
        }
    }

    /// Formats trip dataset statistics.
    pub fn format_ledger(&self, stats: &LedgerStats, path: &Path) -> String {
        let mut lines = vec![
            self.bold("Trip Dataset"),
            "─".repeat(40),
            format!("File:         {}", path.display()),
            format!("Trips:        {}", stats.rows),
            format!(
                "Highest id:   {}",
                stats
                    .highest_trip_id
                    .map_or_else(|| self.dim("none"), |id| id.to_string())
            ),
            format!("Counter:      {}", stats.counter),
        ];
        if stats.unreadable_rows > 0 {
            lines.push(format!(
                "Unreadable:   {}",
                self.red(&stats.unreadable_rows.to_string())
            ));
        }
        if stats.highest_trip_id.is_some_and(|h| h > stats.counter) {
            lines.push(self.yellow("Counter is behind the dataset; the next scrape recovers it."));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < 20.0 {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
