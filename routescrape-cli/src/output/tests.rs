//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::NaiveDate;
    use routescrape_core::{Coordinate, ProviderKind, QuotaRecord};
    use routescrape_providers::ProviderRegistry;
    use routescrape_store::{LedgerStats, Place};
    use std::path::Path;

    use crate::scrape::ScrapeReport;

    fn quota(provider: ProviderKind, remaining: u32, limit: u32) -> QuotaRecord {
        QuotaRecord {
            provider,
            requests_remaining: remaining,
            daily_limit: limit,
            last_reset_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
        }
    }

    #[test]
    fn test_progress_bar_boundary_values() {
        let formatter = TextFormatter::new(false);

        let test_cases = vec![
            (0.0, "░░░░░░░░░░"),
            (10.0, "█░░░░░░░░░"),
            (25.0, "███░░░░░░░"), // 2.5 rounds to 3 blocks
            (50.0, "█████░░░░░"),
            (75.0, "████████░░"), // 7.5 rounds to 8 blocks
            (100.0, "██████████"),
        ];

        for (percent, expected) in test_cases {
            let bar = formatter.progress_bar(percent);
            assert_eq!(bar, expected, "Failed for {}%", percent);
        }
    }

    #[test]
    fn test_progress_bar_with_colors() {
        let formatter = TextFormatter::new(true);

        let bar = formatter.progress_bar(10.0);
        assert!(bar.contains("\x1b[31m"), "Should be red for <20%");

        let bar = formatter.progress_bar(40.0);
        assert!(bar.contains("\x1b[33m"), "Should be yellow for <50%");

        let bar = formatter.progress_bar(80.0);
        assert!(bar.contains("\x1b[32m"), "Should be green for >=50%");
    }

    #[test]
    fn test_format_quota_lines() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_quota(&[
            quota(ProviderKind::Mapbox, 3000, 3000),
            quota(ProviderKind::Here, 250, 1000),
        ]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Mapbox"));
        assert!(lines[0].contains("██████████"));
        assert!(lines[0].contains("3000 / 3000 left"));
        assert!(lines[1].contains("250 / 1000 left"));
        assert!(lines[1].contains("since 2025-06-03"));
    }

    #[test]
    fn test_format_report_hides_zero_failures() {
        let formatter = TextFormatter::new(false);
        let report = ScrapeReport {
            provider: ProviderKind::TomTom,
            requested: 3,
            succeeded_requests: 3,
            failed_requests: 0,
            trips_written: 7,
            write_failures: 0,
        };

        let output = formatter.format_report(&report, Path::new("/data/trips.csv"));
        assert!(output.contains("TomTom scrape finished"));
        assert!(output.contains("3 of 3 succeeded"));
        assert!(output.contains("7 written"));
        assert!(!output.contains("Failed"));
        assert!(output.contains("/data/trips.csv"));
    }

    #[test]
    fn test_format_report_with_failures() {
        let formatter = TextFormatter::new(false);
        let report = ScrapeReport {
            provider: ProviderKind::Here,
            requested: 4,
            succeeded_requests: 2,
            failed_requests: 2,
            trips_written: 3,
            write_failures: 1,
        };

        let output = formatter.format_report(&report, Path::new("trips.csv"));
        assert!(output.contains("Failed:   2"));
        assert!(output.contains("Lost:     1"));
    }

    #[test]
    fn test_format_providers() {
        let formatter = TextFormatter::new(false);
        let header = formatter.format_providers_header();
        assert!(header.contains("Provider"));
        assert!(header.contains("Key variable"));

        let desc = ProviderRegistry::get(ProviderKind::TomTom).unwrap();
        let line = formatter.format_provider_line(desc, true);
        assert!(line.contains("tomtom, tt"));
        assert!(line.contains("TOMTOM_API_KEY"));
        assert!(line.contains("2000"));
        assert!(line.contains('✓'));
    }

    #[test]
    fn test_format_place() {
        let formatter = TextFormatter::new(false);
        let place = Place {
            name: "Chợ Bến Thành".to_string(),
            coordinate: Coordinate::new(10.7721, 106.6983).unwrap(),
        };

        let found = formatter.format_place("ben", Some(&place));
        assert!(found.starts_with("Chợ Bến Thành"));
        assert!(found.contains("10.7721"));

        let missing = formatter.format_place("airport", None);
        assert_eq!(missing, "No place matches 'airport'");
    }

    #[test]
    fn test_format_ledger_warns_on_stale_counter() {
        let formatter = TextFormatter::new(false);
        let stats = LedgerStats {
            rows: 42,
            highest_trip_id: Some(42),
            counter: 40,
            unreadable_rows: 0,
        };

        let output = formatter.format_ledger(&stats, Path::new("trips.csv"));
        assert!(output.contains("Trips:        42"));
        assert!(output.contains("Counter is behind"));
        assert!(!output.contains("Unreadable"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use routescrape_core::ProviderKind;
    use routescrape_providers::ProviderRegistry;
    use routescrape_store::LedgerStats;
    use std::path::Path;

    use crate::scrape::ScrapeReport;

    #[test]
    fn test_format_providers_json() {
        let formatter = JsonFormatter::new(false);
        let providers = ProviderRegistry::all();
        let configured = vec![true; providers.len()];

        let output = formatter.format_providers(providers, &configured).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);

        let here = items
            .iter()
            .find(|item| item["apiKeyEnv"] == "HERE_API_KEY")
            .unwrap();
        assert_eq!(here["defaultDailyLimit"], 1000);
        assert_eq!(here["apiKeyConfigured"], true);
        assert!(here["endpoint"].as_str().unwrap().contains("router.hereapi.com"));
    }

    #[test]
    fn test_format_report_json() {
        let formatter = JsonFormatter::new(false);
        let report = ScrapeReport {
            provider: ProviderKind::Mapbox,
            requested: 2,
            succeeded_requests: 1,
            failed_requests: 1,
            trips_written: 2,
            write_failures: 0,
        };

        let output = formatter
            .format_report(&report, Path::new("/data/trips.csv"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["provider"], "mapbox");
        assert_eq!(value["succeededRequests"], 1);
        assert_eq!(value["tripsWritten"], 2);
        assert_eq!(value["tripsCsv"], "/data/trips.csv");
    }

    #[test]
    fn test_format_ledger_json_empty_dataset() {
        let formatter = JsonFormatter::new(false);
        let stats = LedgerStats {
            rows: 0,
            highest_trip_id: None,
            counter: 0,
            unreadable_rows: 0,
        };

        let output = formatter
            .format_ledger(&stats, Path::new("trips.csv"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["rows"], 0);
        assert!(value.get("highestTripId").is_none());
    }
}
