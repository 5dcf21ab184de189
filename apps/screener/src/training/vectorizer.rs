//! Bag-of-words TF-IDF vectorizer.
//!
//! Tokens are runs of two or more word characters, English stop words are
//! dropped, the vocabulary keeps the `max_features` most frequent terms, idf
//! is smoothed (`ln((1 + n) / (1 + df)) + 1`) and rows are L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ScreenerError, ScreenerResult};

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "either", "etc", "ever", "every", "few", "for", "from", "further",
        "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
        "himself", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its",
        "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
        "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
        "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "upon", "very", "via", "was",
        "we", "were", "what", "when", "where", "whether", "which", "while", "who", "whom",
        "why", "will", "with", "within", "would", "yet", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty() && self.vocabulary.len() == self.idf.len()
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn fit(&mut self, docs: &[String]) -> ScreenerResult<()> {
        if docs.is_empty() {
            return Err(ScreenerError::Validation(
                "cannot fit vectorizer on an empty corpus".to_string(),
            ));
        }

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let mut seen = HashSet::new();
            for token in tokenize(doc) {
                *term_freq.entry(token.clone()).or_default() += 1;
                if seen.insert(token.clone()) {
                    *doc_freq.entry(token).or_default() += 1;
                }
            }
        }

        if term_freq.is_empty() {
            return Err(ScreenerError::Validation(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        // Most frequent first, ties broken alphabetically.
        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        let n = docs.len() as f64;
        self.idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();

        Ok(())
    }

    /// Dense L2-normalized TF-IDF row. Unknown terms are ignored; a document
    /// with no known terms maps to the zero vector.
    pub fn transform(&self, doc: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.idf.len()];
        for token in tokenize(doc) {
            if let Some(&col) = self.vocabulary.get(&token) {
                row[col] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in row.iter_mut() {
                *value /= norm;
            }
        }
        row
    }

    pub fn transform_all(&self, docs: &[String]) -> Vec<Vec<f64>> {
        docs.iter().map(|d| self.transform(d)).collect()
    }

    pub fn fit_transform(&mut self, docs: &[String]) -> ScreenerResult<Vec<Vec<f64>>> {
        self.fit(docs)?;
        Ok(self.transform_all(docs))
    }
}

fn tokenize(doc: &str) -> Vec<String> {
    let lower = doc.to_lowercase();
    RE_TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}
