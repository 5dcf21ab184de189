use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::JobField;
use crate::scoring::ats::ScoreBreakdown;

/// One row of the analysis-history table. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub target_field: JobField,
    pub ats_score: f64,
    pub word_count: usize,
    pub match_percentage: f64,
    pub score_contact_info: f64,
    pub score_professional_summary: f64,
    pub score_work_experience: f64,
    pub score_education: f64,
    pub score_skills: f64,
    pub score_keywords_match: f64,
    pub score_formatting: f64,
    pub score_length: f64,
}

impl AnalysisHistoryRecord {
    pub fn new(
        target_field: JobField,
        ats_score: f64,
        word_count: usize,
        breakdown: &ScoreBreakdown,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            target_field,
            ats_score,
            word_count,
            match_percentage: breakdown.match_percentage(),
            score_contact_info: breakdown.contact_info,
            score_professional_summary: breakdown.professional_summary,
            score_work_experience: breakdown.work_experience,
            score_education: breakdown.education,
            score_skills: breakdown.skills,
            score_keywords_match: breakdown.keywords_match,
            score_formatting: breakdown.formatting,
            score_length: breakdown.length,
        }
    }
}
