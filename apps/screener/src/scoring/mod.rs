// Resume scoring: rule-based ATS points, keyword extraction, gap analysis
// and field recommendation. Nothing here needs a trained model except the
// recommender, which falls back to keyword counts.

pub mod ats;
pub mod extractor;
pub mod handlers;
pub mod recommender;
pub mod suggestions;
