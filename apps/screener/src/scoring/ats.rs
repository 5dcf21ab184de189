//! ATS point-scorer: eight independent rules summed to a bounded 0-100 score.
//!
//! Every rule is a pure function of the resume text (and, for skills and
//! keyword match, the target field's keyword list). The recording entry point
//! `AtsScorer::score` additionally appends a row to the analysis history.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fields::JobField;
use crate::history::HistoryStore;
use crate::models::AnalysisHistoryRecord;
use crate::text::{clean_text, contains_cleaned_keyword, word_count};

// ────────────────────────────────────────────────────────────────────────────
// Categories and breakdown
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsCategory {
    ContactInfo,
    ProfessionalSummary,
    WorkExperience,
    Education,
    Skills,
    KeywordsMatch,
    Formatting,
    Length,
}

impl AtsCategory {
    pub const ALL: [AtsCategory; 8] = [
        AtsCategory::ContactInfo,
        AtsCategory::ProfessionalSummary,
        AtsCategory::WorkExperience,
        AtsCategory::Education,
        AtsCategory::Skills,
        AtsCategory::KeywordsMatch,
        AtsCategory::Formatting,
        AtsCategory::Length,
    ];

    /// Declared maximum; the eight maxima sum to 100.
    pub fn max_score(&self) -> f64 {
        match self {
            AtsCategory::ContactInfo => 10.0,
            AtsCategory::ProfessionalSummary => 8.0,
            AtsCategory::WorkExperience => 25.0,
            AtsCategory::Education => 10.0,
            AtsCategory::Skills => 20.0,
            AtsCategory::KeywordsMatch => 15.0,
            AtsCategory::Formatting => 7.0,
            AtsCategory::Length => 5.0,
        }
    }
}

/// Per-category sub-scores. Each value lies in `[0, category max]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub contact_info: f64,
    pub professional_summary: f64,
    pub work_experience: f64,
    pub education: f64,
    pub skills: f64,
    pub keywords_match: f64,
    pub formatting: f64,
    pub length: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, category: AtsCategory) -> f64 {
        match category {
            AtsCategory::ContactInfo => self.contact_info,
            AtsCategory::ProfessionalSummary => self.professional_summary,
            AtsCategory::WorkExperience => self.work_experience,
            AtsCategory::Education => self.education,
            AtsCategory::Skills => self.skills,
            AtsCategory::KeywordsMatch => self.keywords_match,
            AtsCategory::Formatting => self.formatting,
            AtsCategory::Length => self.length,
        }
    }

    /// Sum of sub-scores clamped to [0, 100].
    pub fn total(&self) -> f64 {
        AtsCategory::ALL
            .iter()
            .map(|c| self.get(*c))
            .sum::<f64>()
            .clamp(0.0, 100.0)
    }

    /// Keyword-match sub-score rescaled to a percentage.
    pub fn match_percentage(&self) -> f64 {
        self.keywords_match * (100.0 / AtsCategory::KeywordsMatch.max_score())
    }

    pub fn detailed(&self) -> Vec<CategoryDetail> {
        AtsCategory::ALL
            .iter()
            .map(|c| {
                let score = self.get(*c);
                let max_score = c.max_score();
                CategoryDetail {
                    category: *c,
                    score,
                    max_score,
                    percentage: ((score / max_score) * 100.0).min(100.0),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub category: AtsCategory,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

/// What happened to the history side effect of a scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryOutcome {
    Recorded,
    Disabled,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsScore {
    pub target_field: JobField,
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    pub word_count: usize,
    pub history: HistoryOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

/// Scores resumes and optionally records every invocation.
pub struct AtsScorer<'a> {
    history: Option<&'a HistoryStore>,
}

impl<'a> AtsScorer<'a> {
    pub fn new() -> Self {
        Self { history: None }
    }

    pub fn with_history(history: &'a HistoryStore) -> Self {
        Self {
            history: Some(history),
        }
    }

    /// Computes the breakdown and appends a history row when a store is
    /// attached. A failed append never changes the returned score.
    pub fn score(&self, text: &str, field: JobField) -> AtsScore {
        let breakdown = compute_breakdown(text, field);
        let total = breakdown.total();
        let words = word_count(text);

        let history = match self.history {
            None => HistoryOutcome::Disabled,
            Some(store) => {
                let record = AnalysisHistoryRecord::new(field, total, words, &breakdown);
                match store.append(&record) {
                    Ok(()) => HistoryOutcome::Recorded,
                    Err(e) => {
                        warn!("Failed to record analysis history: {e}");
                        HistoryOutcome::Failed {
                            message: e.to_string(),
                        }
                    }
                }
            }
        };

        debug!(field = %field, total, "ATS score computed");

        AtsScore {
            target_field: field,
            total,
            breakdown,
            word_count: words,
            history,
        }
    }
}

impl Default for AtsScorer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure scoring: same text and field always give the same breakdown.
pub fn compute_breakdown(text: &str, field: JobField) -> ScoreBreakdown {
    let keywords = field.keywords();
    ScoreBreakdown {
        contact_info: score_contact_info(text),
        professional_summary: score_professional_summary(text),
        work_experience: score_work_experience(text),
        education: score_education(text),
        skills: score_skills(text, keywords),
        keywords_match: score_keywords_match(text, keywords),
        formatting: score_formatting(text),
        length: score_length(text),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static RE_PHONES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b",             // 123-456-7890
        r"\(\d{3}\)\s?\d{3}[-.\s]?\d{4}",                 // (123) 456-7890
        r"\+\d{1,3}[-.\s]?\d{3}[-.\s]?\d{3}[-.\s]?\d{4}", // +1-123-456-7890
        r"\b\d{10}\b",                                    // 1234567890
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_DATE_RANGES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\d{4}\s*[-–]\s*\d{4}\b",
        r"\b\d{4}\s*[-–]\s*present\b",
        r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\w*\s+\d{4}\b",
        r"\b\d{1,2}/\d{4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());
static RE_GPA: Lazy<Regex> = Lazy::new(|| Regex::new(r"gpa|grade point average").unwrap());
static RE_DASH_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s").unwrap());
static RE_CAPITALIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z][a-z]").unwrap());

const SUMMARY_KEYWORDS: &[&str] = &["summary", "objective", "profile", "about", "overview"];
const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "employment",
    "work history",
    "career",
    "professional experience",
];
const EDUCATION_KEYWORDS: &[&str] = &[
    "education",
    "degree",
    "university",
    "college",
    "bachelor",
    "master",
    "phd",
    "diploma",
];
const COURSEWORK_KEYWORDS: &[&str] = &["coursework", "certification", "certified", "course"];
const PROFILE_LINK_KEYWORDS: &[&str] = &["linkedin", "github", "portfolio"];
const SECTION_HEADERS: &[&str] = &["experience", "education", "skills", "summary"];

/// Contact info (max 10): email +4, phone +3, profile link +3.
pub fn score_contact_info(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut score = 0.0;

    if RE_EMAIL.is_match(text) {
        score += 4.0;
    }
    if RE_PHONES.iter().any(|re| re.is_match(text)) {
        score += 3.0;
    }
    if PROFILE_LINK_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += 3.0;
    }

    score
}

/// Professional summary (max 8).
///
/// The first summary keyword found anywhere decides: 8 when some line
/// containing it is followed by 1-3 lines totalling more than ten words,
/// otherwise 4. No keyword scores 0.
pub fn score_professional_summary(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let Some(keyword) = SUMMARY_KEYWORDS.iter().find(|k| lower.contains(*k)) else {
        return 0.0;
    };

    let lines: Vec<&str> = text.split('\n').collect();
    for (i, line) in lines.iter().enumerate() {
        if i + 1 < lines.len() && line.to_lowercase().contains(keyword) {
            let end = (i + 4).min(lines.len());
            let following = lines[i + 1..end].join(" ");
            if word_count(&following) > 10 {
                return 8.0;
            }
        }
    }
    4.0
}

/// Work experience (max 25): section keyword +10, then 5/10/15 for 1/2/3+
/// date-range matches.
pub fn score_work_experience(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut score: f64 = 0.0;

    if EXPERIENCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += 10.0;
    }

    let job_count: usize = RE_DATE_RANGES
        .iter()
        .map(|re| re.find_iter(&lower).count())
        .sum();

    score += match job_count {
        0 => 0.0,
        1 => 5.0,
        2 => 10.0,
        _ => 15.0,
    };

    score.min(AtsCategory::WorkExperience.max_score())
}

/// Education (max 10): keyword +2, year +3, GPA +2, coursework/certification +3.
pub fn score_education(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut score: f64 = 0.0;

    if EDUCATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += 2.0;
    }
    if RE_YEAR.is_match(text) {
        score += 3.0;
    }
    if RE_GPA.is_match(&lower) {
        score += 2.0;
    }
    if COURSEWORK_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += 3.0;
    }

    score.min(AtsCategory::Education.max_score())
}

/// Skills (max 20): "skill" mentioned +5, plus 1.5 per matched field keyword
/// up to 15.
pub fn score_skills(text: &str, field_keywords: &[&str]) -> f64 {
    let lower = text.to_lowercase();
    let base = if lower.contains("skill") { 5.0 } else { 0.0 };
    let found = count_matches(text, field_keywords);
    base + (found as f64 * 1.5).min(15.0)
}

/// Keyword match (max 15): fraction of field keywords present × 15.
pub fn score_keywords_match(text: &str, field_keywords: &[&str]) -> f64 {
    if field_keywords.is_empty() {
        return 0.0;
    }
    let found = count_matches(text, field_keywords);
    (found as f64 / field_keywords.len() as f64) * AtsCategory::KeywordsMatch.max_score()
}

/// Formatting (max 7): section headers (≤4), bullets +2, capitalization +1,
/// −1 for more than five triple-newline runs.
pub fn score_formatting(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut score: f64 = 0.0;

    let sections = SECTION_HEADERS.iter().filter(|s| lower.contains(*s)).count();
    score += sections.min(4) as f64;

    if text.contains('•') || text.contains('·') || RE_DASH_BULLET.is_match(text) {
        score += 2.0;
    }
    if RE_CAPITALIZED.is_match(text) {
        score += 1.0;
    }
    if text.matches("\n\n\n").count() > 5 {
        score -= 1.0;
    }

    score.clamp(0.0, AtsCategory::Formatting.max_score())
}

/// Length (max 5): 300-800 words is optimal.
pub fn score_length(text: &str) -> f64 {
    match word_count(text) {
        300..=800 => 5.0,
        200..=299 | 801..=1200 => 3.0,
        0..=199 => 1.0,
        _ => 2.0,
    }
}

/// Matches on cleaned text, the same normalization the gap analysis uses.
fn count_matches(text: &str, keywords: &[&str]) -> usize {
    let cleaned = clean_text(text);
    keywords
        .iter()
        .filter(|k| contains_cleaned_keyword(&cleaned, k))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStore;

    const SAMPLE_RESUME: &str = "John Doe
Software Engineer
john.doe@email.com
(555) 123-4567
linkedin.com/in/johndoe

SUMMARY
Backend engineer with seven years of experience building reliable distributed services and leading small teams.

EXPERIENCE
Senior Software Engineer at Tech Corp (2020-2023)
- Developed web applications using Python, Django, and React
- Implemented microservices architecture with Docker and Kubernetes
Software Engineer at Startup Inc (Jan 2017 - Dec 2019)

EDUCATION
Bachelor of Science in Computer Science, GPA 3.8
University of Technology (2016)
Relevant coursework: distributed systems

SKILLS
Python, JavaScript, React, SQL, AWS, Docker, Git
";

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_category_maxima_sum_to_100() {
        let sum: f64 = AtsCategory::ALL.iter().map(|c| c.max_score()).sum();
        assert!((sum - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contact_info_full_marks() {
        let text = "Reach me at a@b.com or 555-123-4567, see my linkedin";
        assert_eq!(score_contact_info(text), 10.0);
    }

    #[test]
    fn test_contact_info_partial() {
        assert_eq!(score_contact_info("email: someone@example.org"), 4.0);
        assert_eq!(score_contact_info("call (555) 123-4567"), 3.0);
        assert_eq!(score_contact_info("+1-555-123-4567"), 3.0);
        assert_eq!(score_contact_info("github.com/me"), 3.0);
        assert_eq!(score_contact_info(""), 0.0);
    }

    #[test]
    fn test_professional_summary_substantial() {
        let text = "SUMMARY\nSeasoned engineer who builds data platforms, mentors peers, and ships reliable systems quickly.";
        assert_eq!(score_professional_summary(text), 8.0);
    }

    #[test]
    fn test_professional_summary_heading_only() {
        assert_eq!(score_professional_summary("Summary\nShort line."), 4.0);
        assert_eq!(score_professional_summary("Objective"), 4.0);
        assert_eq!(score_professional_summary("nothing relevant"), 0.0);
    }

    #[test]
    fn test_work_experience_graduated_points() {
        assert_eq!(score_work_experience("Experience"), 10.0);
        assert_eq!(score_work_experience("Experience 2019-2021"), 15.0);
        assert_eq!(score_work_experience("Experience 2019-2021, 2021 - present"), 20.0);
        assert_eq!(
            score_work_experience("Experience 2015-2017, 2017-2019, 03/2020"),
            25.0
        );
        assert_eq!(score_work_experience("2015-2017, 2017-2019, March 2020"), 15.0);
    }

    #[test]
    fn test_education_components() {
        assert_eq!(score_education("University"), 2.0);
        assert_eq!(score_education("Bachelor, 2016, GPA 3.9, certified"), 10.0);
        assert_eq!(score_education("Relevant course work"), 3.0);
        assert_eq!(score_education(""), 0.0);
    }

    #[test]
    fn test_skills_caps_keyword_credit() {
        let all = JobField::SoftwareEngineering.keywords().join(" ");
        let text = format!("Skills: {all}");
        assert_eq!(score_skills(&text, JobField::SoftwareEngineering.keywords()), 20.0);
        assert_eq!(score_skills("python", JobField::SoftwareEngineering.keywords()), 1.5);
    }

    #[test]
    fn test_keywords_match_fraction() {
        let keywords = ["python", "java", "sql", "git"];
        assert!((score_keywords_match("python and sql", &keywords) - 7.5).abs() < 1e-9);
        assert_eq!(score_keywords_match("python", &[]), 0.0);
    }

    #[test]
    fn test_keyword_rules_ignore_punctuation() {
        let keywords = ["full-stack", "node.js"];
        assert!((score_keywords_match("Full Stack engineer on Node JS", &keywords) - 15.0).abs() < 1e-9);
        assert_eq!(score_skills("full stack", &keywords), 1.5);
    }

    #[test]
    fn test_formatting_rewards_structure() {
        let text = "Experience\nEducation\nSkills\nSummary\n• bullet";
        assert_eq!(score_formatting(text), 7.0);
        assert_eq!(score_formatting("- dash bullet"), 2.0);
    }

    #[test]
    fn test_formatting_penalizes_blank_runs() {
        let text = format!("Hello{}", "\n\n\n".repeat(6));
        // capitalization +1, penalty -1
        assert_eq!(score_formatting(&text), 0.0);
    }

    #[test]
    fn test_length_bands() {
        assert_eq!(score_length(&words(150)), 1.0);
        assert_eq!(score_length(&words(199)), 1.0);
        assert_eq!(score_length(&words(250)), 3.0);
        assert_eq!(score_length(&words(300)), 5.0);
        assert_eq!(score_length(&words(800)), 5.0);
        assert_eq!(score_length(&words(1000)), 3.0);
        assert_eq!(score_length(&words(1500)), 2.0);
    }

    #[test]
    fn test_sub_scores_within_maxima() {
        let texts = [
            String::new(),
            SAMPLE_RESUME.to_string(),
            SAMPLE_RESUME.repeat(20),
            words(500),
        ];
        for text in &texts {
            for field in JobField::ALL {
                let breakdown = compute_breakdown(text, field);
                for category in AtsCategory::ALL {
                    let v = breakdown.get(category);
                    assert!(
                        (0.0..=category.max_score()).contains(&v),
                        "{:?} = {v} out of range",
                        category
                    );
                }
                let total = breakdown.total();
                assert!((0.0..=100.0).contains(&total));
            }
        }
    }

    #[test]
    fn test_sample_resume_scores_well() {
        let breakdown = compute_breakdown(SAMPLE_RESUME, JobField::SoftwareEngineering);
        assert_eq!(breakdown.contact_info, 10.0);
        assert_eq!(breakdown.professional_summary, 8.0);
        assert_eq!(breakdown.work_experience, 25.0);
        assert_eq!(breakdown.education, 10.0);
        assert!(breakdown.total() > 60.0);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let scorer = AtsScorer::new();
        let a = scorer.score(SAMPLE_RESUME, JobField::DataAnalyst);
        let b = scorer.score(SAMPLE_RESUME, JobField::DataAnalyst);
        assert_eq!(a.breakdown, b.breakdown);
        assert_eq!(a.total, b.total);
        assert_eq!(a.history, HistoryOutcome::Disabled);
    }

    #[test]
    fn test_detailed_breakdown_percentages() {
        let breakdown = compute_breakdown(SAMPLE_RESUME, JobField::SoftwareEngineering);
        let detailed = breakdown.detailed();
        assert_eq!(detailed.len(), 8);
        let contact = &detailed[0];
        assert_eq!(contact.category, AtsCategory::ContactInfo);
        assert_eq!(contact.max_score, 10.0);
        assert_eq!(contact.percentage, 100.0);
        assert!(detailed.iter().all(|d| d.percentage <= 100.0));
    }

    #[test]
    fn test_score_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));
        let scorer = AtsScorer::with_history(&store);

        let result = scorer.score(SAMPLE_RESUME, JobField::SoftwareEngineering);
        assert_eq!(result.history, HistoryOutcome::Recorded);

        let rows = store.load().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].target_field, JobField::SoftwareEngineering);
        assert!((rows[0].ats_score - result.total).abs() < 1e-9);
    }

    #[test]
    fn test_history_failure_does_not_change_score() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the history file should be makes the append fail.
        let blocked = dir.path().join("history.csv");
        std::fs::create_dir_all(&blocked).unwrap();
        let store = HistoryStore::new(blocked);

        let recorded = AtsScorer::with_history(&store).score(SAMPLE_RESUME, JobField::Consultant);
        let pure = AtsScorer::new().score(SAMPLE_RESUME, JobField::Consultant);

        assert!(matches!(recorded.history, HistoryOutcome::Failed { .. }));
        assert_eq!(recorded.total, pure.total);
        assert_eq!(recorded.breakdown, pure.breakdown);
    }
}
