//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, JSON persistence, and the on-disk formats of
//! the quota file and settings.

use std::path::PathBuf;
use tempfile::TempDir;

use chrono::NaiveDate;
use routescrape_core::{ProviderKind, QuotaRecord};

use crate::persistence::{load_json, load_json_or_default, save_json, temp_path_for};
use crate::quota_store::{DailyLimits, QuotaFile, QuotaStore};
use crate::settings_store::Settings;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        pacing_min_ms: 250,
        ..Settings::default()
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("quota.json");

    let data = serde_json::json!({"key": "value"});

    let result = save_json(&nested_path, &data).await;
    assert!(result.is_ok());
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.is_err());

    let fallback: Settings = load_json_or_default(&file_path).await;
    assert_eq!(fallback, Settings::default());
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("quota.json");

    save_json(&file_path, &serde_json::json!({"v": 1})).await.unwrap();
    save_json(&file_path, &serde_json::json!({"v": 2})).await.unwrap();

    assert!(!temp_path_for(&file_path).exists());
    let loaded: serde_json::Value = load_json(&file_path).await.unwrap();
    assert_eq!(loaded["v"], 2);
}

// ============================================================================
// Quota File Format Tests
// ============================================================================

#[tokio::test]
async fn test_quota_file_roundtrips_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("quota.json");

    let mut file = QuotaFile::new();
    file.insert(
        ProviderKind::Mapbox,
        QuotaRecord {
            provider: ProviderKind::Mapbox,
            requests_remaining: 17,
            daily_limit: 3000,
            last_reset_date: day(3),
        },
    );

    save_json(&file_path, &file).await.unwrap();
    let loaded: QuotaFile = load_json(&file_path).await.unwrap();
    assert_eq!(loaded, file);

    let text = tokio::fs::read_to_string(&file_path).await.unwrap();
    assert!(text.contains("\"mapbox\""));
    assert!(text.contains("\"last_reset_date\": \"2025-06-03\""));
}

#[tokio::test]
async fn test_quota_file_written_by_hand() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("quota.json");
    tokio::fs::write(
        &file_path,
        r#"{"tomtom": {"provider": "tomtom", "requests_remaining": 12,
                       "daily_limit": 2000, "last_reset_date": "2025-06-03"}}"#,
    )
    .await
    .unwrap();

    let mut store = QuotaStore::open_on(&file_path, DailyLimits::new(), day(3)).await;
    assert_eq!(store.remaining_on(ProviderKind::TomTom, day(3)).await, 12);
    assert_eq!(store.remaining_on(ProviderKind::Mapbox, day(3)).await, 3000);
}

// ============================================================================
// Settings File Tests
// ============================================================================

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(
        &file_path,
        r#"{"request_timeout_secs": 10, "theme": "dark", "future_option": [1, 2]}"#,
    )
    .await
    .unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.request_timeout_secs, 10);
    assert_eq!(loaded.max_alternatives, 2);
}

#[tokio::test]
async fn test_unicode_paths_in_settings() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        places_file: Some(PathBuf::from("/data/hcm/địa điểm.csv")),
        ..Settings::default()
    };
    save_json(&file_path, &settings).await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.places_file, settings.places_file);
}
