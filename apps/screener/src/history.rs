use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ScreenerResult;
use crate::fields::JobField;
use crate::models::AnalysisHistoryRecord;

/// Append-only CSV store of scoring invocations.
///
/// No locking: concurrent writers may interleave rows.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first when the file is new or empty.
    pub fn append(&self, record: &AnalysisHistoryRecord) -> ScreenerResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        debug!("Appended analysis history row to {}", self.path.display());
        Ok(())
    }

    /// Reads every row. A missing file is an empty history.
    pub fn load(&self) -> ScreenerResult<Vec<AnalysisHistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: u32,
    pub upper: u32,
    pub count: usize,
}

/// Aggregate usage report over the history table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_analyses: usize,
    pub average_ats_score: f64,
    pub average_match_percentage: f64,
    pub analyses_today: usize,
    pub top_field: Option<JobField>,
    pub field_counts: BTreeMap<JobField, usize>,
    pub score_histogram: Vec<HistogramBucket>,
}

pub fn summarize(records: &[AnalysisHistoryRecord]) -> HistorySummary {
    summarize_as_of(records, Utc::now().date_naive())
}

pub fn summarize_as_of(records: &[AnalysisHistoryRecord], today: NaiveDate) -> HistorySummary {
    let total = records.len();

    let mean = |f: fn(&AnalysisHistoryRecord) -> f64| {
        if total == 0 {
            0.0
        } else {
            records.iter().map(f).sum::<f64>() / total as f64
        }
    };

    let mut field_counts: BTreeMap<JobField, usize> = BTreeMap::new();
    for r in records {
        *field_counts.entry(r.target_field).or_default() += 1;
    }

    // Ties resolve to the first field in enum order.
    let top_field = field_counts
        .iter()
        .fold(None::<(JobField, usize)>, |best, (field, count)| match best {
            Some((_, c)) if c >= *count => best,
            _ => Some((*field, *count)),
        })
        .map(|(field, _)| field);

    let mut score_histogram: Vec<HistogramBucket> = (0..10)
        .map(|i| HistogramBucket {
            lower: i * 10,
            upper: i * 10 + 10,
            count: 0,
        })
        .collect();
    for r in records {
        let idx = ((r.ats_score.clamp(0.0, 100.0) / 10.0).floor() as usize).min(9);
        score_histogram[idx].count += 1;
    }

    HistorySummary {
        total_analyses: total,
        average_ats_score: mean(|r| r.ats_score),
        average_match_percentage: mean(|r| r.match_percentage),
        analyses_today: records
            .iter()
            .filter(|r| r.timestamp.date_naive() == today)
            .count(),
        top_field,
        field_counts,
        score_histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ats::ScoreBreakdown;
    use chrono::{Duration, TimeZone};

    fn record(field: JobField, score: f64) -> AnalysisHistoryRecord {
        let breakdown = ScoreBreakdown {
            contact_info: 10.0,
            keywords_match: 3.0,
            ..Default::default()
        };
        AnalysisHistoryRecord::new(field, score, 420, &breakdown)
    }

    #[test]
    fn test_append_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.csv"));

        store.append(&record(JobField::SoftwareEngineering, 71.5)).unwrap();
        store.append(&record(JobField::Consultant, 40.0)).unwrap();

        let rows = store.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].target_field, JobField::SoftwareEngineering);
        assert_eq!(rows[1].target_field, JobField::Consultant);
        assert!((rows[0].ats_score - 71.5).abs() < 1e-9);
        assert!((rows[0].match_percentage - 20.0).abs() < 1e-9);
        assert_eq!(rows[0].score_contact_info, 10.0);
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let store = HistoryStore::new(&path);

        store.append(&record(JobField::DataAnalyst, 50.0)).unwrap();
        store.append(&record(JobField::DataAnalyst, 60.0)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,target_field,ats_score,word_count,match_percentage,score_contact_info"));
        assert!(lines[0].ends_with("score_formatting,score_length"));
        assert_eq!(raw.matches("timestamp").count(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("absent.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_summary_aggregates() {
        let today = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let mut rows = vec![
            record(JobField::SoftwareEngineering, 80.0),
            record(JobField::SoftwareEngineering, 100.0),
            record(JobField::Consultant, 35.0),
        ];
        rows[0].timestamp = today;
        rows[1].timestamp = today;
        rows[2].timestamp = today - Duration::days(3);

        let summary = summarize_as_of(&rows, today.date_naive());
        assert_eq!(summary.total_analyses, 3);
        assert!((summary.average_ats_score - 215.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.analyses_today, 2);
        assert_eq!(summary.top_field, Some(JobField::SoftwareEngineering));
        assert_eq!(summary.field_counts[&JobField::Consultant], 1);
        assert_eq!(summary.score_histogram.len(), 10);
        assert_eq!(summary.score_histogram[3].count, 1);
        assert_eq!(summary.score_histogram[8].count, 1);
        // 100 lands in the last bucket
        assert_eq!(summary.score_histogram[9].count, 1);
    }

    #[test]
    fn test_summary_of_empty_history() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_analyses, 0);
        assert_eq!(summary.average_ats_score, 0.0);
        assert_eq!(summary.top_field, None);
        assert!(summary.field_counts.is_empty());
    }
}
