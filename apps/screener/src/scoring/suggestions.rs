use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::JobField;
use crate::text::word_count;

const MAX_SUGGESTIONS: usize = 8;
const MAX_CONSIDERED_MISSING: usize = 10;

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "problem solving",
    "teamwork",
    "presentation",
];

const TOOLS_AND_PLATFORMS: &[&str] = &["aws", "docker", "kubernetes", "tableau", "power bi", "git", "jira"];

static RE_QUANTIFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+%|\d+\+|increased|improved|reduced").unwrap());

/// Builds improvement suggestions from the missing skills of `field`.
///
/// Only the first ten missing skills are categorized. The list is capped at
/// eight entries.
pub fn generate_suggestions(missing: &[&str], field: JobField, resume_text: &str) -> Vec<String> {
    if missing.is_empty() {
        return vec![format!(
            "Excellent! Your resume covers most required skills for {field}"
        )];
    }

    let mut technical = Vec::new();
    let mut tools = Vec::new();
    let mut soft = Vec::new();

    for skill in missing.iter().take(MAX_CONSIDERED_MISSING) {
        let lower = skill.to_lowercase();
        if SOFT_SKILLS.contains(&lower.as_str()) {
            soft.push(*skill);
        } else if TOOLS_AND_PLATFORMS.contains(&lower.as_str()) {
            tools.push(*skill);
        } else {
            technical.push(*skill);
        }
    }

    let mut suggestions = Vec::new();
    if !technical.is_empty() {
        suggestions.push(format!(
            "Consider adding technical skills: {}",
            technical.iter().take(5).copied().collect::<Vec<_>>().join(", ")
        ));
    }
    if !tools.is_empty() {
        suggestions.push(format!(
            "Include experience with tools/platforms: {}",
            tools.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ));
    }
    if !soft.is_empty() {
        suggestions.push(format!(
            "Highlight soft skills: {}",
            soft.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ));
    }

    suggestions.extend(field.profile().tips.iter().map(|t| t.to_string()));

    let lower = resume_text.to_lowercase();
    if !lower.contains("project") {
        suggestions.push("Add a projects section to showcase practical experience".to_string());
    }
    if word_count(resume_text) < 300 {
        suggestions.push("Expand your resume with more detailed descriptions".to_string());
    }
    if !RE_QUANTIFIED.is_match(&lower) {
        suggestions.push("Include quantifiable achievements and metrics".to_string());
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
