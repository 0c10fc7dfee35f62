use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Column order for the historical backfill log.
pub const FLAG_LOG_HEADER: [&str; 7] = [
    "date_local",
    "flag_text",
    "normalized_flag",
    "source_url",
    "wayback_ts",
    "wayback_url",
    "fetched_at_utc",
];

/// Column order for the daily logger's file.
pub const DAILY_LOG_HEADER: [&str; 5] = [
    "date_local",
    "flag_text",
    "normalized_flag",
    "source_url",
    "fetched_at_utc",
];

/// One resolved day, as written to the historical log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagObservation {
    pub date_local: String,
    pub flag_text: String,
    pub normalized_flag: String,
    pub source_url: String,
    pub wayback_ts: String,
    pub wayback_url: String,
    pub fetched_at_utc: String,
}

/// One day's live scrape, as written to the daily log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlagRow {
    pub date_local: String,
    pub flag_text: String,
    pub normalized_flag: String,
    pub source_url: String,
    pub fetched_at_utc: String,
}

/// What [`upsert_daily_row`] did with today's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Append,
    Update,
}

impl UpsertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertAction::Append => "append",
            UpsertAction::Update => "update",
        }
    }
}

/// Create the log with exactly its header row when missing. An existing
/// file is left untouched, whatever it contains.
pub fn ensure_header(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(FLAG_LOG_HEADER)?;
    writer.flush()?;
    Ok(())
}

/// Append one row to the historical log. The file is opened and closed per
/// call; [`ensure_header`] must have run first.
pub fn append_observation(path: &Path, observation: &FlagObservation) -> Result<()> {
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for append", path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.serialize(observation)?;
    writer.flush()?;
    Ok(())
}

/// Insert or replace the row for `row.date_local`, keeping the daily log
/// at one row per day across repeated runs.
pub fn upsert_daily_row(path: &Path, row: &DailyFlagRow) -> Result<UpsertAction> {
    let mut rows: Vec<DailyFlagRow> = Vec::new();
    if path.exists() {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        for record in reader.deserialize() {
            rows.push(record.with_context(|| format!("Bad row in {}", path.display()))?);
        }
    }

    let action = match rows.iter_mut().find(|r| r.date_local == row.date_local) {
        Some(existing) => {
            *existing = row.clone();
            UpsertAction::Update
        }
        None => {
            rows.push(row.clone());
            UpsertAction::Append
        }
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(DAILY_LOG_HEADER)?;
    for r in &rows {
        writer.serialize(r)?;
    }
    writer.flush()?;
    Ok(action)
}
