//! Labeled training dataset: CSV loading, seeding and statistics.

pub mod seed;
pub mod summary;

use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{ScreenerError, ScreenerResult};

pub use seed::seed_dataset;
pub use summary::{summarize, DatasetSummary};

pub const REQUIRED_COLUMNS: [&str; 2] = ["resume_text", "job_field"];

/// One labeled row. `job_field` stays a raw label until training prepares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub id: Option<String>,
    pub resume_text: String,
    pub job_field: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub experience_level: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub ats_score: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub skills_count: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub created_date: Option<NaiveDate>,
}

/// Reads the dataset at `path`. Fails when the file is absent, lacks a
/// required column, or holds no rows.
pub fn load_dataset(path: &Path) -> ScreenerResult<Vec<DatasetRecord>> {
    if !path.exists() {
        return Err(ScreenerError::NotFound(format!(
            "dataset not found at {}",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        return Err(ScreenerError::Dataset(format!(
            "dataset {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    if records.is_empty() {
        return Err(ScreenerError::Dataset(format!(
            "dataset {} has no rows",
            path.display()
        )));
    }

    info!("Loaded {} dataset rows from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_dataset(path: &Path, records: &[DatasetRecord]) -> ScreenerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads the dataset when present and valid; otherwise writes the built-in
/// balanced dataset to `path` and returns it.
pub fn ensure_dataset(path: &Path, seed: u64) -> ScreenerResult<Vec<DatasetRecord>> {
    if path.exists() {
        match load_dataset(path) {
            Ok(records) => return Ok(records),
            Err(e) => warn!("Existing dataset at {} is unusable ({e}); regenerating", path.display()),
        }
    }

    let records = seed_dataset(Utc::now().date_naive(), seed);
    write_dataset(path, &records)?;
    info!("Seeded dataset with {} rows at {}", records.len(), path.display());
    Ok(records)
}
