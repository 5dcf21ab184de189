//! Presence checks for the files the screener reads and writes.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::TrainingMetadata;
use crate::state::AppState;
use crate::training::bundle::ArtifactPaths;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCheck {
    pub name: &'static str,
    pub path: PathBuf,
    pub present: bool,
}

impl StatusCheck {
    fn probe(name: &'static str, path: &Path) -> Self {
        Self {
            name,
            path: path.to_path_buf(),
            present: path.exists(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub checks: Vec<StatusCheck>,
    pub model_loaded: Option<String>,
    /// When and how the loaded model was trained.
    pub training: Option<TrainingMetadata>,
    /// Dataset and model artifacts are all in place.
    pub ready: bool,
}

pub fn system_status(state: &AppState) -> SystemStatus {
    let config = &state.config;
    let artifacts = ArtifactPaths::in_dir(&config.models_dir);

    let checks = vec![
        StatusCheck::probe("data_directory", &config.data_dir),
        StatusCheck::probe("models_directory", &config.models_dir),
        StatusCheck::probe("training_dataset", &config.dataset_path()),
        StatusCheck::probe("trained_classifier", &artifacts.classifier),
        StatusCheck::probe("vectorizer", &artifacts.vectorizer),
        StatusCheck::probe("training_metadata", &artifacts.metadata),
        StatusCheck::probe("analysis_history", state.history.path()),
    ];

    let ready = checks
        .iter()
        .filter(|c| matches!(c.name, "training_dataset" | "trained_classifier" | "vectorizer"))
        .all(|c| c.present);

    SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        checks,
        model_loaded: state.model.as_ref().map(|m| m.model_name().to_string()),
        training: state.model.as_ref().and_then(|m| m.metadata.clone()),
        ready,
    }
}
