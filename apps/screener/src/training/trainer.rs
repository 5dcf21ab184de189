//! Sequential training pipeline: Load → Prepare → Fit → Persist.
//!
//! Any stage failure ends the run with a `TrainingOutcome::Failed` naming the
//! stage. Artifacts are only touched in the final stage, after every payload
//! has been built.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::TrainingConfig;
use crate::dataset::{load_dataset, DatasetRecord};
use crate::errors::{ScreenerError, ScreenerResult};
use crate::fields::JobField;
use crate::models::{ModelMetrics, TrainingMetadata};
use crate::text::clean_text;
use crate::training::bundle::ArtifactSet;
use crate::training::classifiers::{candidate_models, Classifier, TrainedClassifier, CANDIDATE_NAMES};
use crate::training::metrics::evaluate;
use crate::training::split::{train_test_split, SplitStrategy};
use crate::training::vectorizer::TfidfVectorizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStage {
    Load,
    Prepare,
    Fit,
    Persist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub best_model: String,
    pub best_accuracy: f64,
    pub metrics: BTreeMap<String, ModelMetrics>,
    pub split_strategy: SplitStrategy,
    pub train_rows: usize,
    pub test_rows: usize,
    pub dropped_rows: usize,
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingFailure {
    pub stage: TrainingStage,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainingOutcome {
    Completed(TrainingReport),
    Failed(TrainingFailure),
}

/// Cleaned texts with their parsed labels.
#[derive(Debug, Clone, Default)]
pub struct PreparedData {
    pub texts: Vec<String>,
    pub labels: Vec<JobField>,
    pub dropped: usize,
}

struct FitResult {
    classifier: TrainedClassifier,
    vectorizer: TfidfVectorizer,
    metrics: BTreeMap<String, ModelMetrics>,
    best_accuracy: f64,
    split_strategy: SplitStrategy,
    train_rows: usize,
    test_rows: usize,
}

pub struct ModelTrainer {
    config: TrainingConfig,
    dataset_path: PathBuf,
    models_dir: PathBuf,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig, dataset_path: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            dataset_path: dataset_path.into(),
            models_dir: models_dir.into(),
        }
    }

    pub fn run(&self) -> TrainingOutcome {
        info!("Training field classifier from {}", self.dataset_path.display());

        let records = match load_dataset(&self.dataset_path) {
            Ok(r) => r,
            Err(e) => return failed(TrainingStage::Load, e),
        };

        let prepared = match prepare(&records) {
            Ok(p) => p,
            Err(e) => return failed(TrainingStage::Prepare, e),
        };

        let fit = match self.fit(&prepared) {
            Ok(f) => f,
            Err(e) => return failed(TrainingStage::Fit, e),
        };

        let metadata = TrainingMetadata {
            training_date: Utc::now(),
            best_model: fit.classifier.name().to_string(),
            best_accuracy: fit.best_accuracy,
            models_trained: CANDIDATE_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let artifacts = ArtifactSet {
            classifier: &fit.classifier,
            vectorizer: &fit.vectorizer,
            metrics: &fit.metrics,
            metadata: &metadata,
        };
        if let Err(e) = artifacts.persist(&self.models_dir) {
            return failed(TrainingStage::Persist, e);
        }

        info!(
            "Training complete: best model {} with accuracy {:.3}",
            metadata.best_model, metadata.best_accuracy
        );

        TrainingOutcome::Completed(TrainingReport {
            best_model: metadata.best_model,
            best_accuracy: metadata.best_accuracy,
            metrics: fit.metrics,
            split_strategy: fit.split_strategy,
            train_rows: fit.train_rows,
            test_rows: fit.test_rows,
            dropped_rows: prepared.dropped,
            models_dir: self.models_dir.clone(),
        })
    }

    fn fit(&self, data: &PreparedData) -> ScreenerResult<FitResult> {
        let classes: Vec<JobField> = data
            .labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(ScreenerError::Dataset(format!(
                "need at least two job fields to train, found {}",
                classes.len()
            )));
        }
        let y: Vec<usize> = data
            .labels
            .iter()
            .map(|label| classes.iter().position(|c| c == label).unwrap_or(0))
            .collect();

        let mut vectorizer = TfidfVectorizer::new(self.config.max_features);
        let x = vectorizer.fit_transform(&data.texts)?;

        let split = train_test_split(&y, self.config.test_fraction, self.config.seed)?;
        let pick = |rows: &[usize]| -> (Vec<Vec<f64>>, Vec<usize>) {
            rows.iter().map(|&i| (x[i].clone(), y[i])).unzip()
        };
        let (x_train, y_train) = pick(&split.train);
        let (x_test, y_test) = pick(&split.test);
        info!(
            "Split {} rows into {} train / {} test ({:?})",
            y.len(),
            y_train.len(),
            y_test.len(),
            split.strategy
        );

        let mut metrics = BTreeMap::new();
        let mut best: Option<(f64, TrainedClassifier)> = None;

        for mut model in candidate_models() {
            let name = model.name();
            info!("Training {name}...");
            model.fit(&x_train, &y_train, classes.len())?;

            let y_pred: Vec<usize> = x_test.iter().map(|row| model.predict(row)).collect();
            let m = evaluate(&y_test, &y_pred, classes.len());
            info!(
                "{name}: accuracy {:.3}, precision {:.3}, recall {:.3}",
                m.accuracy, m.precision, m.recall
            );
            metrics.insert(name.to_string(), m);

            if best.as_ref().map_or(true, |(acc, _)| m.accuracy > *acc) {
                best = Some((
                    m.accuracy,
                    TrainedClassifier {
                        classes: classes.clone(),
                        n_features: vectorizer.n_features(),
                        model,
                    },
                ));
            }
        }

        let (best_accuracy, classifier) =
            best.ok_or_else(|| ScreenerError::Model("no candidate models were trained".to_string()))?;

        Ok(FitResult {
            classifier,
            vectorizer,
            metrics,
            best_accuracy,
            split_strategy: split.strategy,
            train_rows: y_train.len(),
            test_rows: y_test.len(),
        })
    }
}

/// Cleans every text and parses every label, dropping rows that are empty
/// after cleaning or carry an unknown field.
pub fn prepare(records: &[DatasetRecord]) -> ScreenerResult<PreparedData> {
    let mut data = PreparedData::default();
    let mut unknown: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let cleaned = clean_text(&record.resume_text);
        if cleaned.is_empty() {
            data.dropped += 1;
            continue;
        }
        match JobField::from_str(&record.job_field) {
            Ok(field) => {
                data.texts.push(cleaned);
                data.labels.push(field);
            }
            Err(_) => {
                *unknown.entry(record.job_field.clone()).or_default() += 1;
                data.dropped += 1;
            }
        }
    }

    for (label, count) in &unknown {
        warn!("Dropped {count} rows with unknown job field '{label}'");
    }

    if data.texts.is_empty() {
        return Err(ScreenerError::Dataset(
            "no usable rows after cleaning and label validation".to_string(),
        ));
    }
    Ok(data)
}

fn failed(stage: TrainingStage, err: ScreenerError) -> TrainingOutcome {
    warn!("Training failed during {stage:?}: {err}");
    TrainingOutcome::Failed(TrainingFailure {
        stage,
        code: err.code().to_string(),
        message: err.to_string(),
    })
}
