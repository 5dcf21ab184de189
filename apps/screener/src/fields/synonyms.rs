//! Related-term table used for partial skill credit.
//!
//! Each related term present in the resume adds `CREDIT_PER_TERM`, capped at
//! `MAX_PARTIAL_CREDIT`. The built-in table covers a handful of skills; a JSON
//! object `{ "skill": ["term", ...] }` can replace it at startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ScreenerError, ScreenerResult};
use crate::text::contains_keyword;

pub const CREDIT_PER_TERM: f64 = 0.2;
pub const MAX_PARTIAL_CREDIT: f64 = 0.8;

const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    (
        "python",
        &["programming", "coding", "development", "script", "django", "flask"],
    ),
    (
        "sql",
        &["database", "query", "data", "mysql", "postgresql", "oracle"],
    ),
    (
        "machine learning",
        &["ml", "ai", "artificial intelligence", "model", "algorithm"],
    ),
    (
        "project management",
        &["pm", "agile", "scrum", "planning", "coordination"],
    ),
    (
        "javascript",
        &["js", "web development", "frontend", "react", "angular", "vue"],
    ),
    (
        "data visualization",
        &["charts", "graphs", "dashboard", "reporting", "visual"],
    ),
    (
        "consulting",
        &["advisory", "strategy", "client", "business", "recommendations"],
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SkillSynonyms {
    table: BTreeMap<String, Vec<String>>,
}

impl Default for SkillSynonyms {
    fn default() -> Self {
        let table = DEFAULT_TABLE
            .iter()
            .map(|(skill, terms)| {
                (
                    skill.to_string(),
                    terms.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        Self { table }
    }
}

impl SkillSynonyms {
    pub fn from_json_file(path: &Path) -> ScreenerResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ScreenerError::NotFound(format!("synonym table {}: {e}", path.display()))
        })?;
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)?;
        let table = parsed
            .into_iter()
            .map(|(skill, terms)| {
                (
                    skill.trim().to_lowercase(),
                    terms.into_iter().map(|t| t.trim().to_lowercase()).collect(),
                )
            })
            .collect::<BTreeMap<_, _>>();
        info!("Loaded {} synonym entries from {}", table.len(), path.display());
        Ok(Self { table })
    }

    /// Loads the table from `path` when given, the built-in table otherwise.
    pub fn load(path: Option<&Path>) -> ScreenerResult<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn related_terms(&self, skill: &str) -> Option<&[String]> {
        self.table.get(&skill.to_lowercase()).map(Vec::as_slice)
    }

    /// Partial credit for `skill` given already-cleaned resume text.
    /// Returns 0.0 for skills without an entry.
    pub fn partial_credit(&self, skill: &str, cleaned_text: &str) -> f64 {
        let Some(terms) = self.related_terms(skill) else {
            return 0.0;
        };
        let hits = terms
            .iter()
            .filter(|term| contains_keyword(cleaned_text, term))
            .count();
        (hits as f64 * CREDIT_PER_TERM).min(MAX_PARTIAL_CREDIT)
    }

    pub fn skill_count(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_covers_seven_skills() {
        let synonyms = SkillSynonyms::default();
        assert_eq!(synonyms.skill_count(), 7);
        assert!(synonyms.related_terms("python").is_some());
        assert!(synonyms.related_terms("Python").is_some());
        assert!(synonyms.related_terms("docker").is_none());
    }

    #[test]
    fn test_partial_credit_per_term() {
        let synonyms = SkillSynonyms::default();
        let credit = synonyms.partial_credit("python", "built apis with django and flask");
        assert!((credit - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_partial_credit_is_capped() {
        let synonyms = SkillSynonyms::default();
        let text = "programming coding development script django flask";
        assert!((synonyms.partial_credit("python", text) - MAX_PARTIAL_CREDIT).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_skill_gets_no_credit() {
        let synonyms = SkillSynonyms::default();
        assert_eq!(synonyms.partial_credit("kubernetes", "docker helm containers"), 0.0);
    }

    #[test]
    fn test_short_terms_match_whole_tokens_only() {
        let synonyms = SkillSynonyms::default();
        // "ai" inside "maintained" must not count.
        assert_eq!(synonyms.partial_credit("machine learning", "maintained servers"), 0.0);
        assert!((synonyms.partial_credit("machine learning", "applied ai research") - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_json_file_normalizes_case() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Rust": ["Cargo", "tokio"]}}"#).unwrap();

        let synonyms = SkillSynonyms::load(Some(file.path())).unwrap();
        assert_eq!(synonyms.skill_count(), 1);
        assert_eq!(
            synonyms.related_terms("rust").unwrap(),
            &["cargo".to_string(), "tokio".to_string()]
        );
        assert!((synonyms.partial_credit("rust", "cargo workspaces") - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = SkillSynonyms::load(Some(Path::new("/nonexistent/synonyms.json"))).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
