// Field classifier: TF-IDF features, candidate models, evaluation, and the
// persisted bundle used for inference.

pub mod bundle;
pub mod classifiers;
pub mod handlers;
pub mod metrics;
pub mod split;
pub mod trainer;
pub mod vectorizer;
