//! Append-only trip dataset with durable id allocation.
//!
//! Two files back the ledger:
//!
//! - `trip_counter.json` holds the last issued trip id.
//! - `trips.csv` holds one row per trip:
//!   `trip_id,timestamp,distance,duration,geometry`.
//!
//! Ids are persisted before the row is written, so a crash between the two
//! burns an id instead of reusing one. On open, the highest id already in the
//! CSV is used as a floor in case the counter file is stale.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use routescrape_core::{TRIP_CSV_HEADER, TripRecord};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::persistence::{ensure_parent_dir, load_json_or_default, save_json};

// ============================================================================
// Counter File
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct TripCounter {
    #[serde(default)]
    last_trip_id: u64,
}

// ============================================================================
// Ledger Stats
// ============================================================================

/// Summary of the dataset on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    /// Data rows in the CSV (header excluded).
    pub rows: u64,
    /// Highest trip id found in the CSV.
    pub highest_trip_id: Option<u64>,
    /// Value of the durable counter.
    pub counter: u64,
    /// Rows whose `trip_id` could not be read.
    pub unreadable_rows: u64,
}

// ============================================================================
// Trip Ledger
// ============================================================================

/// The trip dataset and its id counter.
#[derive(Debug)]
pub struct TripLedger {
    csv_path: PathBuf,
    counter_path: PathBuf,
    floor: u64,
    header_settled: bool,
}

impl TripLedger {
    /// Opens the ledger, recovering the id floor from the CSV.
    #[instrument(skip_all, fields(csv = %csv_path.as_ref().display()))]
    pub async fn open(
        csv_path: impl AsRef<Path>,
        counter_path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let csv_path = csv_path.as_ref().to_path_buf();
        let counter_path = counter_path.as_ref().to_path_buf();

        let scan = scan_csv(&csv_path).await?;
        let counter: TripCounter = load_json_or_default(&counter_path).await;
        let highest = scan.highest_trip_id.unwrap_or(0);
        if highest > counter.last_trip_id {
            warn!(
                counter = counter.last_trip_id,
                highest, "Trip counter behind dataset, recovering from CSV"
            );
        }

        let floor = highest.max(counter.last_trip_id);
        debug!(floor, rows = scan.rows, "Trip ledger opened");
        Ok(Self {
            csv_path,
            counter_path,
            floor,
            header_settled: false,
        })
    }

    /// Path of the CSV dataset.
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Path of the counter file.
    pub fn counter_path(&self) -> &Path {
        &self.counter_path
    }

    /// Issues the next trip id, persisting it before returning.
    pub async fn next_trip_id(&mut self) -> Result<u64, StoreError> {
        let stored: TripCounter = load_json_or_default(&self.counter_path).await;
        let id = stored.last_trip_id.max(self.floor) + 1;

        save_json(&self.counter_path, &TripCounter { last_trip_id: id }).await?;
        self.floor = id;
        debug!(trip_id = id, "Trip id issued");
        Ok(id)
    }

    /// Appends one row.
    ///
    /// The header is written together with the first row when the file is
    /// missing or empty. A last row left without its line terminator is
    /// closed first so the new row cannot merge into it. The row is flushed
    /// to disk before returning.
    pub async fn append(&mut self, record: &TripRecord) -> Result<(), StoreError> {
        let tail = if self.header_settled {
            FileTail::Terminated
        } else {
            read_tail(&self.csv_path).await?
        };
        let needs_header = tail == FileTail::Empty;

        let mut prefix = Vec::new();
        if tail == FileTail::Unterminated {
            warn!(path = %self.csv_path.display(), "Last row has no line end, closing it");
            prefix.push(b'\n');
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(prefix);
        if needs_header {
            writer.write_record(TRIP_CSV_HEADER)?;
        }
        writer.write_record(record.to_row())?;
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Io(std::io::Error::other(e.to_string())))?;

        ensure_parent_dir(&self.csv_path).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)
            .await?;
        file.write_all(&bytes).await?;
        file.sync_data().await?;

        if needs_header {
            info!(path = %self.csv_path.display(), "Created trip dataset");
        }
        self.header_settled = true;
        debug!(trip_id = record.trip_id, "Trip appended");
        Ok(())
    }

    /// Reads dataset statistics.
    pub async fn stats(&self) -> Result<LedgerStats, StoreError> {
        let scan = scan_csv(&self.csv_path).await?;
        let counter: TripCounter = load_json_or_default(&self.counter_path).await;
        Ok(LedgerStats {
            rows: scan.rows,
            highest_trip_id: scan.highest_trip_id,
            counter: counter.last_trip_id,
            unreadable_rows: scan.unreadable_rows,
        })
    }
}

// ============================================================================
// CSV Scan
// ============================================================================

#[derive(Debug, Default)]
struct CsvScan {
    rows: u64,
    highest_trip_id: Option<u64>,
    unreadable_rows: u64,
}

/// State of the CSV's last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileTail {
    /// Missing or zero length.
    Empty,
    /// Ends with `\n`.
    Terminated,
    Unterminated,
}

async fn read_tail(path: &Path) -> Result<FileTail, StoreError> {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileTail::Empty),
        Err(e) => return Err(e.into()),
    };
    if file.metadata().await?.len() == 0 {
        return Ok(FileTail::Empty);
    }

    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(if last[0] == b'\n' {
        FileTail::Terminated
    } else {
        FileTail::Unterminated
    })
}

async fn scan_csv(path: &Path) -> Result<CsvScan, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CsvScan::default()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let id_column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == TRIP_CSV_HEADER[0])
        .unwrap_or(0);

    let mut scan = CsvScan::default();
    for row in reader.records() {
        scan.rows += 1;
        let id = row
            .ok()
            .and_then(|r| r.get(id_column).and_then(|v| v.trim().parse::<u64>().ok()));
        match id {
            Some(id) => scan.highest_trip_id = Some(scan.highest_trip_id.map_or(id, |h| h.max(id))),
            None => scan.unreadable_rows += 1,
        }
    }
    if scan.unreadable_rows > 0 {
        warn!(path = %path.display(), count = scan.unreadable_rows, "Rows without a readable trip_id");
    }
    Ok(scan)
}

// ============================================================================
// Tests
// ============================================================================
