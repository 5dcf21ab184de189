use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Held-out evaluation of one candidate model. Precision and recall are
/// support-weighted averages over classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Contents of `training_metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub training_date: DateTime<Utc>,
    pub best_model: String,
    pub best_accuracy: f64,
    pub models_trained: Vec<String>,
}
