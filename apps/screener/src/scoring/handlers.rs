//! Command handlers for scoring, analysis and recommendation.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::ScreenerResult;
use crate::fields::JobField;
use crate::models::Resume;
use crate::scoring::ats::{AtsScore, AtsScorer, CategoryDetail};
use crate::scoring::extractor::{analyze_resume, extract_skills, ResumeAnalysis, SkillHits};
use crate::scoring::recommender::{recommend_fields, Recommendation};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub resume_id: uuid::Uuid,
    pub ats: AtsScore,
    pub detailed_breakdown: Vec<CategoryDetail>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resume_id: uuid::Uuid,
    pub ats: AtsScore,
    pub detailed_breakdown: Vec<CategoryDetail>,
    pub analysis: ResumeAnalysis,
    pub extracted_skills: SkillHits,
    pub recommendation: Recommendation,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn scorer(state: &AppState, record: bool) -> AtsScorer<'_> {
    if record {
        AtsScorer::with_history(&state.history)
    } else {
        AtsScorer::new()
    }
}

/// `screener score`
///
/// ATS points for one resume against a target field. Blank text scores
/// low rather than failing.
pub fn handle_score(state: &AppState, text: &str, field: JobField, record: bool) -> ScreenerResult<ScoreResponse> {
    let resume = Resume::new(text);
    if resume.is_blank() {
        warn!("Resume {} has no scorable text", resume.id);
    }
    let ats = scorer(state, record).score(&resume.raw_text, field);
    info!(
        "Scored resume {} ({} words) for {field}: {:.1}",
        resume.id,
        resume.word_count(),
        ats.total
    );

    Ok(ScoreResponse {
        resume_id: resume.id,
        detailed_breakdown: ats.breakdown.detailed(),
        ats,
    })
}

/// `screener analyze`
///
/// Full report: ATS points, keyword gap analysis with suggestions, extracted
/// skills per field and a field recommendation.
pub fn handle_analyze(state: &AppState, text: &str, field: JobField, record: bool) -> ScreenerResult<AnalyzeResponse> {
    let resume = Resume::new(text);
    let ats = scorer(state, record).score(&resume.raw_text, field);
    let analysis = analyze_resume(&resume.raw_text, field, &state.synonyms);
    let recommendation = recommend_fields(&resume.raw_text, state.model.as_ref());

    info!(
        "Analyzed resume {}: ats {:.1}, match {:.1}%, recommended {}",
        resume.id, ats.total, analysis.match_percentage, recommendation.top_field
    );

    Ok(AnalyzeResponse {
        resume_id: resume.id,
        detailed_breakdown: ats.breakdown.detailed(),
        extracted_skills: extract_skills(&resume.raw_text),
        ats,
        analysis,
        recommendation,
    })
}

/// `screener recommend`
pub fn handle_recommend(state: &AppState, text: &str) -> ScreenerResult<Recommendation> {
    Ok(recommend_fields(text, state.model.as_ref()))
}
