//! Text normalization shared by extraction, scoring and training.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lowercases, replaces every non-ASCII-alphanumeric character with a space
/// and collapses whitespace runs. Returns an empty string for blank input.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = RE_NON_ALNUM.replace_all(&lower, " ");
    RE_WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Whitespace-delimited word count of the raw text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Case-insensitive keyword containment.
///
/// `haystack` must already be lowercased (raw or cleaned). Single-token
/// keywords of at most two characters ("r", "ml") only match whole tokens,
/// otherwise they would hit almost every document.
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    if needle.len() <= 2 && !needle.contains(' ') {
        return haystack
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| token == needle);
    }
    haystack.contains(&needle)
}

/// Keyword containment against text that has been through `clean_text`.
/// The keyword is cleaned too, so "Full-Stack" and "full stack" agree.
pub fn contains_cleaned_keyword(cleaned: &str, keyword: &str) -> bool {
    contains_keyword(cleaned, &clean_text(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            clean_text("  Senior  Engineer -- Node.js,\n\tReact!  "),
            "senior engineer node js react"
        );
    }

    #[test]
    fn test_clean_text_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   !!! ...  "), "");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two\nthree\t four"), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_short_keyword_requires_whole_token() {
        assert!(contains_keyword("experience with r and python", "r"));
        assert!(!contains_keyword("senior engineer", "r"));
    }

    #[test]
    fn test_long_keyword_is_substring_match() {
        assert!(contains_keyword("unit testing and debugging", "testing"));
        assert!(contains_keyword("built microservices", "microservices"));
        assert!(!contains_keyword("built services", "microservices"));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_on_needle() {
        assert!(contains_keyword("power bi dashboards", "Power BI"));
    }

    #[test]
    fn test_cleaned_keyword_ignores_punctuation() {
        let cleaned = clean_text("Full Stack developer, Node.js");
        assert!(contains_cleaned_keyword(&cleaned, "full-stack"));
        assert!(contains_cleaned_keyword(&cleaned, "node.js"));
        assert!(!contains_cleaned_keyword(&cleaned, "react"));
    }
}
