use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldShare {
    pub count: usize,
    pub percentage: f64,
}

/// Mean, range and sample standard deviation of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl NumericStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std = if values.len() < 2 {
            0.0
        } else {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        };
        Some(Self { mean, min, max, std })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    /// Keyed by the raw label as it appears in the file.
    pub field_distribution: BTreeMap<String, FieldShare>,
    pub average_text_length: f64,
    pub latest_created_date: Option<NaiveDate>,
    pub ats_score: Option<NumericStats>,
    pub skills_count: Option<NumericStats>,
}

pub fn summarize(records: &[DatasetRecord]) -> DatasetSummary {
    let total = records.len();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.job_field.clone()).or_default() += 1;
    }
    let field_distribution = counts
        .into_iter()
        .map(|(label, count)| {
            let percentage = count as f64 / total as f64 * 100.0;
            (label, FieldShare { count, percentage })
        })
        .collect();

    let average_text_length = if total == 0 {
        0.0
    } else {
        records
            .iter()
            .map(|r| r.resume_text.chars().count())
            .sum::<usize>() as f64
            / total as f64
    };

    let ats: Vec<f64> = records.iter().filter_map(|r| r.ats_score).collect();
    let skills: Vec<f64> = records
        .iter()
        .filter_map(|r| r.skills_count.map(f64::from))
        .collect();

    DatasetSummary {
        total_records: total,
        field_distribution,
        average_text_length,
        latest_created_date: records.iter().filter_map(|r| r.created_date).max(),
        ats_score: NumericStats::from_values(&ats),
        skills_count: NumericStats::from_values(&skills),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(field: &str, text: &str, ats: Option<f64>, date: Option<NaiveDate>) -> DatasetRecord {
        DatasetRecord {
            id: None,
            resume_text: text.to_string(),
            job_field: field.to_string(),
            experience_level: None,
            ats_score: ats,
            skills_count: None,
            created_date: date,
        }
    }

    #[test]
    fn test_summary_statistics() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 5);
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 9);
        let records = vec![
            row("Consultant", "abcd", Some(70.0), d1),
            row("Consultant", "ab", Some(90.0), d2),
            row("Data Analyst", "abcdef", None, None),
            row("Software Engineering", "abcd", Some(80.0), None),
        ];
        let s = summarize(&records);
        assert_eq!(s.total_records, 4);
        assert_eq!(s.field_distribution["Consultant"].count, 2);
        assert!((s.field_distribution["Consultant"].percentage - 50.0).abs() < 1e-9);
        assert!((s.average_text_length - 4.0).abs() < 1e-9);
        assert_eq!(s.latest_created_date, d2);

        let ats = s.ats_score.unwrap();
        assert!((ats.mean - 80.0).abs() < 1e-9);
        assert_eq!(ats.min, 70.0);
        assert_eq!(ats.max, 90.0);
        assert!((ats.std - 10.0).abs() < 1e-9);
        assert!(s.skills_count.is_none());
    }

    #[test]
    fn test_single_value_has_zero_std() {
        let stats = NumericStats::from_values(&[5.0]).unwrap();
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_empty_dataset_summary() {
        let s = summarize(&[]);
        assert_eq!(s.total_records, 0);
        assert!(s.field_distribution.is_empty());
        assert_eq!(s.average_text_length, 0.0);
        assert!(s.ats_score.is_none());
    }
}
