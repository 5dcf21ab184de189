//! Keyword/skill extraction and target-field gap analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{JobField, SkillSynonyms};
use crate::scoring::suggestions::generate_suggestions;
use crate::text::{clean_text, contains_cleaned_keyword};

/// Field → keywords found in the text, in profile order.
pub type SkillHits = BTreeMap<JobField, Vec<&'static str>>;

/// Finds every profile keyword present in the cleaned text.
/// Keywords are cleaned the same way, so "node.js" matches "Node.js".
pub fn extract_skills(text: &str) -> SkillHits {
    let cleaned = clean_text(text);
    JobField::ALL
        .iter()
        .map(|field| (*field, keywords_present(&cleaned, field.keywords())))
        .collect()
}

fn keywords_present(cleaned: &str, keywords: &'static [&'static str]) -> Vec<&'static str> {
    if cleaned.is_empty() {
        return Vec::new();
    }
    keywords
        .iter()
        .copied()
        .filter(|kw| contains_cleaned_keyword(cleaned, kw))
        .collect()
}

/// 1.0 for an exact hit, otherwise synonym partial credit (≤ 0.8).
pub fn skill_score(skill: &str, cleaned_text: &str, synonyms: &SkillSynonyms) -> f64 {
    if contains_cleaned_keyword(cleaned_text, skill) {
        return 1.0;
    }
    synonyms.partial_credit(skill, cleaned_text)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: String,
    pub score: f64,
}

/// Gap analysis of a resume against one target field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub target_field: JobField,
    pub match_percentage: f64,
    pub requirements_met: Vec<String>,
    pub requirements_missing: Vec<String>,
    pub skills_analysis: Vec<SkillScore>,
    pub suggestions: Vec<String>,
}

pub fn analyze_resume(text: &str, field: JobField, synonyms: &SkillSynonyms) -> ResumeAnalysis {
    let cleaned = clean_text(text);
    let required = field.keywords();
    let met = keywords_present(&cleaned, required);

    let match_percentage = if required.is_empty() {
        0.0
    } else {
        met.len() as f64 / required.len() as f64 * 100.0
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|kw| !met.contains(kw))
        .collect();

    let skills_analysis = required
        .iter()
        .map(|skill| SkillScore {
            skill: skill.to_string(),
            score: skill_score(skill, &cleaned, synonyms),
        })
        .collect();

    let suggestions = generate_suggestions(&missing, field, text);

    ResumeAnalysis {
        target_field: field,
        match_percentage,
        requirements_met: met.iter().map(|s| s.to_string()).collect(),
        requirements_missing: missing.iter().map(|s| s.to_string()).collect(),
        skills_analysis,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_skills_per_field() {
        let hits = extract_skills("Built Node.js APIs with Docker; strong SQL and Tableau dashboards.");
        let swe = &hits[&JobField::SoftwareEngineering];
        assert!(swe.contains(&"node.js"));
        assert!(swe.contains(&"docker"));
        assert!(swe.contains(&"sql"));
        assert!(swe.contains(&"api"));
        let da = &hits[&JobField::DataAnalyst];
        assert!(da.contains(&"tableau"));
        assert!(da.contains(&"sql"));
        assert!(hits[&JobField::Consultant].is_empty());
    }

    #[test]
    fn test_extract_skills_returns_every_field() {
        let hits = extract_skills("");
        assert_eq!(hits.len(), JobField::ALL.len());
        assert!(hits.values().all(Vec::is_empty));
    }

    #[test]
    fn test_hyphenated_keyword_matches_after_cleaning() {
        let hits = extract_skills("Full-Stack developer");
        assert!(hits[&JobField::SoftwareEngineering].contains(&"full-stack"));
    }

    #[test]
    fn test_skill_score_exact_and_partial() {
        let synonyms = SkillSynonyms::default();
        let cleaned = clean_text("Wrote Django and Flask services");
        assert_eq!(skill_score("Django", &cleaned, &synonyms), 1.0);
        assert!((skill_score("python", &cleaned, &synonyms) - 0.4).abs() < 1e-9);
        assert_eq!(skill_score("kubernetes", &cleaned, &synonyms), 0.0);
    }

    #[test]
    fn test_analyze_resume_match_percentage() {
        let synonyms = SkillSynonyms::default();
        let text = "Consulting, strategy and negotiation for enterprise clients.";
        let analysis = analyze_resume(text, JobField::Consultant, &synonyms);
        let expected = 3.0 / JobField::Consultant.keywords().len() as f64 * 100.0;
        assert!((analysis.match_percentage - expected).abs() < 1e-9);
        assert_eq!(
            analysis.requirements_met,
            vec!["consulting", "strategy", "negotiation"]
        );
        assert_eq!(
            analysis.requirements_met.len() + analysis.requirements_missing.len(),
            JobField::Consultant.keywords().len()
        );
    }

    #[test]
    fn test_skills_analysis_uses_partial_credit_for_missing() {
        let synonyms = SkillSynonyms::default();
        let text = "Delivered web development with React and Angular";
        let analysis = analyze_resume(text, JobField::SoftwareEngineering, &synonyms);
        let js = analysis
            .skills_analysis
            .iter()
            .find(|s| s.skill == "javascript")
            .unwrap();
        // web development, react, angular
        assert!((js.score - 0.6).abs() < 1e-9);
        let react = analysis
            .skills_analysis
            .iter()
            .find(|s| s.skill == "react")
            .unwrap();
        assert_eq!(react.score, 1.0);
        assert!(analysis.skills_analysis.iter().all(|s| (0.0..=1.0).contains(&s.score)));
    }
}
