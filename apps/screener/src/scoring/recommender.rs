//! Field recommendation: trained model when available, keyword counts otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fields::JobField;
use crate::scoring::extractor::extract_skills;
use crate::text::clean_text;
use crate::training::bundle::{top_entry, ModelBundle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    NoModel,
    EmptyText,
    ModelError { message: String },
}

/// Where the probabilities came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationSource {
    Model { model_name: String },
    KeywordHeuristic { fallback: FallbackReason },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// One entry per `JobField`, summing to 1.
    pub probabilities: BTreeMap<JobField, f64>,
    pub top_field: JobField,
    pub source: RecommendationSource,
}

pub fn recommend_fields(text: &str, model: Option<&ModelBundle>) -> Recommendation {
    if clean_text(text).is_empty() {
        return heuristic(text, FallbackReason::EmptyText);
    }

    let Some(bundle) = model else {
        return heuristic(text, FallbackReason::NoModel);
    };

    match bundle.probabilities(text) {
        Ok(probabilities) => {
            let source = RecommendationSource::Model {
                model_name: bundle.model_name().to_string(),
            };
            build(probabilities, source)
        }
        Err(e) => {
            warn!("Model recommendation failed, using keyword heuristic: {e}");
            heuristic(
                text,
                FallbackReason::ModelError {
                    message: e.to_string(),
                },
            )
        }
    }
}

/// Share of all keyword hits that belong to each field; uniform when
/// nothing matches.
pub fn keyword_probabilities(text: &str) -> BTreeMap<JobField, f64> {
    let hits = extract_skills(text);
    let total: usize = hits.values().map(Vec::len).sum();
    let n = JobField::ALL.len() as f64;

    JobField::ALL
        .iter()
        .map(|field| {
            let p = if total == 0 {
                1.0 / n
            } else {
                hits.get(field).map_or(0, Vec::len) as f64 / total as f64
            };
            (*field, p)
        })
        .collect()
}

fn heuristic(text: &str, fallback: FallbackReason) -> Recommendation {
    debug!("Keyword heuristic recommendation ({fallback:?})");
    build(
        keyword_probabilities(text),
        RecommendationSource::KeywordHeuristic { fallback },
    )
}

fn build(probabilities: BTreeMap<JobField, f64>, source: RecommendationSource) -> Recommendation {
    let top_field = top_entry(&probabilities)
        .map(|(field, _)| field)
        .unwrap_or(JobField::ALL[0]);
    Recommendation {
        probabilities,
        top_field,
        source,
    }
}
