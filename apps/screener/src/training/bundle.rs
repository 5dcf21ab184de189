//! Persisted model artifacts and inference over them.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

use crate::errors::{ScreenerError, ScreenerResult};
use crate::fields::JobField;
use crate::models::{ModelMetrics, TrainingMetadata};
use crate::text::clean_text;
use crate::training::classifiers::TrainedClassifier;
use crate::training::vectorizer::TfidfVectorizer;

pub const CLASSIFIER_FILE: &str = "field_classifier.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const METRICS_FILE: &str = "performance_metrics.json";
pub const METADATA_FILE: &str = "training_metadata.json";

/// Locations of the four artifacts inside a models directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub vectorizer: PathBuf,
    pub metrics: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            classifier: dir.join(CLASSIFIER_FILE),
            vectorizer: dir.join(VECTORIZER_FILE),
            metrics: dir.join(METRICS_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }

    /// All four paths in write order.
    pub fn all(&self) -> [&Path; 4] {
        [&self.classifier, &self.vectorizer, &self.metrics, &self.metadata]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_field: JobField,
    pub confidence: f64,
    pub probabilities: BTreeMap<JobField, f64>,
    pub model_name: String,
}

/// A fitted classifier and the vectorizer it was trained against.
/// Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub classifier: TrainedClassifier,
    pub vectorizer: TfidfVectorizer,
    pub metadata: Option<TrainingMetadata>,
}

impl ModelBundle {
    /// Loads the bundle from `dir`. Returns `Ok(None)` when the classifier or
    /// vectorizer artifact is absent; metadata is optional.
    pub fn load(dir: &Path) -> ScreenerResult<Option<Self>> {
        let paths = ArtifactPaths::in_dir(dir);
        if !paths.classifier.exists() || !paths.vectorizer.exists() {
            debug!("No trained model in {}", dir.display());
            return Ok(None);
        }

        let classifier: TrainedClassifier = read_json(&paths.classifier)?;
        let vectorizer: TfidfVectorizer = read_json(&paths.vectorizer)?;
        let metadata = if paths.metadata.is_file() {
            Some(read_json(&paths.metadata)?)
        } else {
            None
        };

        if !vectorizer.is_fitted() {
            return Err(ScreenerError::Model(format!(
                "vectorizer in {} is not fitted",
                dir.display()
            )));
        }
        if vectorizer.n_features() != classifier.n_features {
            return Err(ScreenerError::Model(format!(
                "vectorizer has {} features but classifier expects {}",
                vectorizer.n_features(),
                classifier.n_features
            )));
        }

        info!("Loaded {} model from {}", classifier.name(), dir.display());
        Ok(Some(Self {
            classifier,
            vectorizer,
            metadata,
        }))
    }

    pub fn model_name(&self) -> &'static str {
        self.classifier.name()
    }

    /// Probabilities over every `JobField`, summing to 1. Fields the
    /// classifier was not trained on get 0.
    pub fn probabilities(&self, text: &str) -> ScreenerResult<BTreeMap<JobField, f64>> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(ScreenerError::Validation("text is empty after cleaning".to_string()));
        }

        let row = self.vectorizer.transform(&cleaned);
        let mut probabilities: BTreeMap<JobField, f64> =
            JobField::ALL.iter().map(|f| (*f, 0.0)).collect();
        for (field, p) in self.classifier.probabilities(&row) {
            probabilities.insert(field, p);
        }

        let total: f64 = probabilities.values().sum();
        if total <= 0.0 {
            return Err(ScreenerError::Model(
                "classifier produced no probability mass".to_string(),
            ));
        }
        Ok(probabilities)
    }

    pub fn predict(&self, text: &str) -> ScreenerResult<Prediction> {
        let probabilities = self.probabilities(text)?;
        let (predicted_field, confidence) = top_entry(&probabilities)
            .ok_or_else(|| ScreenerError::Model("no classes to predict".to_string()))?;
        Ok(Prediction {
            predicted_field,
            confidence,
            probabilities,
            model_name: self.model_name().to_string(),
        })
    }
}

/// Highest-probability field; ties go to the first in `JobField` order.
pub fn top_entry(probabilities: &BTreeMap<JobField, f64>) -> Option<(JobField, f64)> {
    probabilities
        .iter()
        .fold(None, |best: Option<(JobField, f64)>, (field, p)| match best {
            Some((_, bp)) if bp >= *p => best,
            _ => Some((*field, *p)),
        })
}

/// Everything a successful training run writes.
pub struct ArtifactSet<'a> {
    pub classifier: &'a TrainedClassifier,
    pub vectorizer: &'a TfidfVectorizer,
    pub metrics: &'a BTreeMap<String, ModelMetrics>,
    pub metadata: &'a TrainingMetadata,
}

impl ArtifactSet<'_> {
    /// Writes all four artifacts or none of them.
    ///
    /// Payloads are serialized and staged as temp files in `dir` before any
    /// target is touched. Existing artifacts are moved aside, and restored if
    /// any rename fails.
    pub fn persist(&self, dir: &Path) -> ScreenerResult<ArtifactPaths> {
        let payloads = [
            serde_json::to_vec(self.classifier)?,
            serde_json::to_vec(self.vectorizer)?,
            serde_json::to_vec_pretty(self.metrics)?,
            serde_json::to_vec_pretty(self.metadata)?,
        ];

        std::fs::create_dir_all(dir)?;
        let paths = ArtifactPaths::in_dir(dir);
        let targets = paths.all();

        let mut staged = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(payload)?;
            tmp.as_file().sync_all()?;
            staged.push(tmp);
        }

        let backup_dir = TempDir::new_in(dir)?;
        let mut backups: Vec<(&Path, PathBuf)> = Vec::new();
        for (i, target) in targets.into_iter().enumerate() {
            if !target.is_file() {
                continue;
            }
            let backup = backup_dir.path().join(format!("{i}.bak"));
            if let Err(e) = std::fs::rename(target, &backup) {
                restore(&backups);
                return Err(e.into());
            }
            backups.push((target, backup));
        }

        let mut written: Vec<&Path> = Vec::new();
        for (tmp, target) in staged.into_iter().zip(targets) {
            if let Err(e) = tmp.persist(target) {
                for path in &written {
                    if let Err(rm) = std::fs::remove_file(path) {
                        warn!("Failed to remove {}: {rm}", path.display());
                    }
                }
                restore(&backups);
                return Err(anyhow::Error::new(e.error)
                    .context(format!("failed to persist {}", target.display()))
                    .into());
            }
            debug!("Wrote {}", target.display());
            written.push(target);
        }
        Ok(ArtifactPaths::in_dir(dir))
    }
}

fn restore(backups: &[(&Path, PathBuf)]) {
    for (target, backup) in backups {
        if let Err(e) = std::fs::rename(backup, target) {
            warn!("Failed to restore {}: {e}", target.display());
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ScreenerResult<T> {
    let raw = std::fs::read(path)?;
    serde_json::from_slice(&raw).map_err(|e| {
        ScreenerError::Model(format!("failed to parse {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::classifiers::{Classifier, ClassifierModel, LinearSvm, MultinomialNb};
    use chrono::Utc;

    fn fitted_bundle(model: ClassifierModel, classes: Vec<JobField>) -> ModelBundle {
        let docs: Vec<String> = vec![
            "python java docker kubernetes".to_string(),
            "python java api microservices".to_string(),
            "consulting strategy stakeholder".to_string(),
            "consulting negotiation strategy".to_string(),
        ];
        let mut vectorizer = TfidfVectorizer::new(100);
        let x = vectorizer.fit_transform(&docs).unwrap();
        let mut model = model;
        model.fit(&x, &[0, 0, 1, 1], 2).unwrap();
        ModelBundle {
            classifier: TrainedClassifier {
                classes,
                n_features: vectorizer.n_features(),
                model,
            },
            vectorizer,
            metadata: None,
        }
    }

    fn two_class() -> Vec<JobField> {
        vec![JobField::SoftwareEngineering, JobField::Consultant]
    }

    #[test]
    fn test_probabilities_cover_all_fields() {
        let bundle = fitted_bundle(ClassifierModel::NaiveBayes(MultinomialNb::new(1.0)), two_class());
        let probs = bundle.probabilities("Senior Python and Java engineer").unwrap();
        assert_eq!(probs.len(), JobField::ALL.len());
        assert_eq!(probs[&JobField::DataAnalyst], 0.0);
        assert!((probs.values().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs[&JobField::SoftwareEngineering] > probs[&JobField::Consultant]);
    }

    #[test]
    fn test_predict_without_native_probabilities() {
        let bundle = fitted_bundle(ClassifierModel::LinearSvm(LinearSvm::new(0.5, 1e-3, 200)), two_class());
        let prediction = bundle.predict("consulting strategy engagement").unwrap();
        assert_eq!(prediction.predicted_field, JobField::Consultant);
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.model_name, "Linear SVM");
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let bundle = fitted_bundle(ClassifierModel::NaiveBayes(MultinomialNb::new(1.0)), two_class());
        assert!(bundle.predict("  !!  ").is_err());
    }

    #[test]
    fn test_persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = fitted_bundle(ClassifierModel::NaiveBayes(MultinomialNb::new(1.0)), two_class());
        let metrics: BTreeMap<String, ModelMetrics> = [(
            "Naive Bayes".to_string(),
            ModelMetrics { accuracy: 1.0, precision: 1.0, recall: 1.0 },
        )]
        .into_iter()
        .collect();
        let metadata = TrainingMetadata {
            training_date: Utc::now(),
            best_model: "Naive Bayes".to_string(),
            best_accuracy: 1.0,
            models_trained: vec!["Naive Bayes".to_string()],
        };

        let paths = ArtifactSet {
            classifier: &bundle.classifier,
            vectorizer: &bundle.vectorizer,
            metrics: &metrics,
            metadata: &metadata,
        }
        .persist(dir.path())
        .unwrap();
        assert!(paths.metrics.exists());

        let loaded = ModelBundle::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.metadata, Some(metadata));
        let text = "python docker";
        let before = bundle.probabilities(text).unwrap();
        let after = loaded.probabilities(text).unwrap();
        for field in JobField::ALL {
            assert!((before[&field] - after[&field]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_failed_persist_keeps_previous_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = fitted_bundle(ClassifierModel::NaiveBayes(MultinomialNb::new(1.0)), two_class());
        let metrics: BTreeMap<String, ModelMetrics> = BTreeMap::new();
        let metadata = |name: &str| TrainingMetadata {
            training_date: Utc::now(),
            best_model: name.to_string(),
            best_accuracy: 0.5,
            models_trained: vec![name.to_string()],
        };
        let first = metadata("Naive Bayes");
        ArtifactSet {
            classifier: &bundle.classifier,
            vectorizer: &bundle.vectorizer,
            metrics: &metrics,
            metadata: &first,
        }
        .persist(dir.path())
        .unwrap();
        let classifier_before = std::fs::read(dir.path().join(CLASSIFIER_FILE)).unwrap();

        // Block the last write.
        let metadata_path = dir.path().join(METADATA_FILE);
        std::fs::remove_file(&metadata_path).unwrap();
        std::fs::create_dir(&metadata_path).unwrap();
        std::fs::write(metadata_path.join("keep"), b"x").unwrap();

        let other = fitted_bundle(ClassifierModel::LinearSvm(LinearSvm::new(0.5, 1e-3, 50)), two_class());
        let second = metadata("Linear SVM");
        let err = ArtifactSet {
            classifier: &other.classifier,
            vectorizer: &other.vectorizer,
            metrics: &metrics,
            metadata: &second,
        }
        .persist(dir.path())
        .unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");

        assert_eq!(std::fs::read(dir.path().join(CLASSIFIER_FILE)).unwrap(), classifier_before);
        assert!(dir.path().join(VECTORIZER_FILE).is_file());
        assert!(dir.path().join(METRICS_FILE).is_file());
        let loaded = ModelBundle::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.model_name(), "Naive Bayes");
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModelBundle::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_is_model_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CLASSIFIER_FILE), b"not json").unwrap();
        std::fs::write(dir.path().join(VECTORIZER_FILE), b"{}").unwrap();
        let err = ModelBundle::load(dir.path()).unwrap_err();
        assert_eq!(err.code(), "MODEL_ERROR");
    }

    #[test]
    fn test_top_entry_prefers_first_on_tie() {
        let probs: BTreeMap<JobField, f64> = JobField::ALL.iter().map(|f| (*f, 1.0 / 3.0)).collect();
        assert_eq!(top_entry(&probs).unwrap().0, JobField::SoftwareEngineering);
    }
}
