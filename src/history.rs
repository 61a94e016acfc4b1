use std::fs::{self, OpenOptions};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PracticeMode;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history format error: {0}")]
    Csv(#[from] csv::Error),
}

/// One completed practice run, as logged to `history.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub finished_at: DateTime<Utc>,
    pub mode: PracticeMode,
    pub item_count: usize,
    pub randomized: bool,
    /// Where the list came from, e.g. the photo's file name.
    pub source: String,
}

/// Append one record, creating the file (and its directory) on first use.
pub fn append(path: &Path, record: &HistoryRecord) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // the header row goes in once, not on every append
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

/// All logged runs, oldest first. A missing file is just an empty history.
pub fn load(path: &Path) -> Result<Vec<HistoryRecord>, HistoryError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// The most recent run, if any was ever logged.
pub fn last_practiced(path: &Path) -> Option<HistoryRecord> {
    load(path).ok().and_then(|mut records| records.pop())
}
