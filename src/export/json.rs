//! JSON import/export of the progress store.
//! The file layout is `{ "<list>": { "<problem id>": { ...record } } }` with
//! `YYYY-MM-DD` dates, the same shape the store serializes to.

use crate::models::ProgressStore;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid progress file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Suggested file name for an export made on `today`
pub fn default_export_name(today: NaiveDate) -> String {
    format!("leetcode-progress-{}.json", today.format("%Y-%m-%d"))
}

/// Writes the store as pretty-printed JSON to `path`.
pub fn export_progress_to_path(store: &ProgressStore, path: &Path) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(store)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    info!(path = %path.display(), records = store.len(), "exported progress");
    Ok(())
}

/// Reads a progress store from a JSON file.
/// Fails if the file doesn't exist or doesn't have the store's shape.
pub fn import_progress(path: &Path) -> Result<ProgressStore, ExportError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let store: ProgressStore = serde_json::from_str(&contents)?;

    info!(path = %path.display(), records = store.len(), "imported progress");
    Ok(store)
}
