//! Command handlers for training, prediction and dataset inspection.

use crate::dataset::{ensure_dataset, load_dataset, summarize, DatasetSummary};
use crate::errors::{ScreenerError, ScreenerResult};
use crate::state::AppState;
use crate::training::bundle::Prediction;
use crate::training::trainer::{ModelTrainer, TrainingOutcome};

/// `screener train`
///
/// With `seed_if_missing`, writes the built-in dataset first when none is
/// usable. Stage failures come back as `TrainingOutcome::Failed`; only the
/// seeding step can return an error.
pub fn handle_train(state: &AppState, seed_if_missing: bool) -> ScreenerResult<TrainingOutcome> {
    let dataset_path = state.config.dataset_path();
    if seed_if_missing {
        ensure_dataset(&dataset_path, state.config.training.seed)?;
    }

    let trainer = ModelTrainer::new(
        state.config.training.clone(),
        dataset_path,
        state.config.models_dir.clone(),
    );
    Ok(trainer.run())
}

/// `screener predict`
pub fn handle_predict(state: &AppState, text: &str) -> ScreenerResult<Prediction> {
    let bundle = state.model.as_ref().ok_or_else(|| {
        ScreenerError::NotFound(format!(
            "No trained model in {}. Run `screener train` first.",
            state.config.models_dir.display()
        ))
    })?;
    bundle.predict(text)
}

/// `screener dataset`
pub fn handle_dataset_summary(state: &AppState, seed_if_missing: bool) -> ScreenerResult<DatasetSummary> {
    let path = state.config.dataset_path();
    let records = if seed_if_missing {
        ensure_dataset(&path, state.config.training.seed)?
    } else {
        load_dataset(&path)?
    };
    Ok(summarize(&records))
}
