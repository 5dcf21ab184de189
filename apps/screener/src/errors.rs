use thiserror::Error;

/// Screener-level error type.
/// Every variant maps to a stable machine code so failures can be reported
/// as structured values (see `training::trainer::TrainingOutcome`).
#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ScreenerError {
    pub fn code(&self) -> &'static str {
        match self {
            ScreenerError::NotFound(_) => "NOT_FOUND",
            ScreenerError::Validation(_) => "VALIDATION_ERROR",
            ScreenerError::Dataset(_) => "DATASET_ERROR",
            ScreenerError::Model(_) => "MODEL_ERROR",
            ScreenerError::Io(_) => "IO_ERROR",
            ScreenerError::Csv(_) => "CSV_ERROR",
            ScreenerError::Json(_) => "JSON_ERROR",
            ScreenerError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "INTERNAL_ERROR"
            }
        }
    }
}

pub type ScreenerResult<T> = Result<T, ScreenerError>;
