//! Candidate text classifiers over dense TF-IDF rows.
//!
//! Every model works on class indices `0..n_classes`; the mapping to
//! `JobField` lives in `TrainedClassifier`. Models are deterministic given
//! the same training data.

use serde::{Deserialize, Serialize};

use crate::errors::{ScreenerError, ScreenerResult};
use crate::fields::JobField;

pub const NAIVE_BAYES: &str = "Naive Bayes";
pub const LOGISTIC_REGRESSION: &str = "Logistic Regression";
pub const LINEAR_SVM: &str = "Linear SVM";

/// Names of the candidates the trainer fits, in evaluation order.
pub const CANDIDATE_NAMES: [&str; 3] = [NAIVE_BAYES, LOGISTIC_REGRESSION, LINEAR_SVM];

// Finite stand-in for ln(0) so fitted models survive a JSON round-trip.
const LOG_ZERO: f64 = -1e30;

pub trait Classifier {
    fn name(&self) -> &'static str;

    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> ScreenerResult<()>;

    fn predict(&self, x: &[f64]) -> usize;

    /// Class probabilities, or `None` for models without a probabilistic output.
    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>>;
}

// ────────────────────────────────────────────────────────────────────────────
// Multinomial naive Bayes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
        }
    }

    fn joint_log_likelihood(&self, x: &[f64]) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, flp)| prior + dot(flp, x))
            .collect()
    }
}

impl Classifier for MultinomialNb {
    fn name(&self) -> &'static str {
        NAIVE_BAYES
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> ScreenerResult<()> {
        let n_features = validate_training_set(x, y, n_classes)?;

        let mut class_count = vec![0usize; n_classes];
        let mut feature_count = vec![vec![0.0; n_features]; n_classes];
        for (row, &label) in x.iter().zip(y) {
            class_count[label] += 1;
            for (acc, v) in feature_count[label].iter_mut().zip(row) {
                *acc += v;
            }
        }

        let n = y.len() as f64;
        self.class_log_prior = class_count
            .iter()
            .map(|&c| if c == 0 { LOG_ZERO } else { (c as f64 / n).ln() })
            .collect();
        self.feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + self.alpha * n_features as f64;
                counts
                    .into_iter()
                    .map(|c| ((c + self.alpha) / total).ln())
                    .collect()
            })
            .collect();
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> usize {
        argmax(&self.joint_log_likelihood(x))
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>> {
        Some(softmax(&self.joint_log_likelihood(x)))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Multinomial logistic regression (softmax, full-batch gradient descent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    learning_rate: f64,
    l2: f64,
    epochs: usize,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, l2: f64, epochs: usize) -> Self {
        Self {
            learning_rate,
            l2,
            epochs,
            weights: Vec::new(),
            bias: Vec::new(),
        }
    }

    fn logits(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| dot(w, x) + b)
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        LOGISTIC_REGRESSION
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> ScreenerResult<()> {
        let n_features = validate_training_set(x, y, n_classes)?;
        let n = x.len() as f64;

        self.weights = vec![vec![0.0; n_features]; n_classes];
        self.bias = vec![0.0; n_classes];

        for _ in 0..self.epochs {
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];

            for (row, &label) in x.iter().zip(y) {
                let probs = softmax(&self.logits(row));
                for (c, p) in probs.iter().enumerate() {
                    let err = p - if c == label { 1.0 } else { 0.0 };
                    grad_b[c] += err;
                    for (g, v) in grad_w[c].iter_mut().zip(row) {
                        *g += err * v;
                    }
                }
            }

            for c in 0..n_classes {
                for (w, g) in self.weights[c].iter_mut().zip(&grad_w[c]) {
                    *w -= self.learning_rate * (g / n + self.l2 * *w);
                }
                self.bias[c] -= self.learning_rate * grad_b[c] / n;
            }
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> usize {
        argmax(&self.logits(x))
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>> {
        Some(softmax(&self.logits(x)))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// One-vs-rest linear SVM (hinge loss, full-batch subgradient descent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvm {
    learning_rate: f64,
    lambda: f64,
    epochs: usize,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LinearSvm {
    pub fn new(learning_rate: f64, lambda: f64, epochs: usize) -> Self {
        Self {
            learning_rate,
            lambda,
            epochs,
            weights: Vec::new(),
            bias: Vec::new(),
        }
    }

    fn decision_function(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| dot(w, x) + b)
            .collect()
    }
}

impl Classifier for LinearSvm {
    fn name(&self) -> &'static str {
        LINEAR_SVM
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> ScreenerResult<()> {
        let n_features = validate_training_set(x, y, n_classes)?;
        let n = x.len() as f64;

        self.weights = vec![vec![0.0; n_features]; n_classes];
        self.bias = vec![0.0; n_classes];

        for c in 0..n_classes {
            let w = &mut self.weights[c];
            let b = &mut self.bias[c];
            for _ in 0..self.epochs {
                let mut grad_w: Vec<f64> = w.iter().map(|wj| self.lambda * wj).collect();
                let mut grad_b = 0.0;
                for (row, &label) in x.iter().zip(y) {
                    let target = if label == c { 1.0 } else { -1.0 };
                    if target * (dot(w, row) + *b) < 1.0 {
                        for (g, v) in grad_w.iter_mut().zip(row) {
                            *g -= target * v / n;
                        }
                        grad_b -= target / n;
                    }
                }
                for (wj, g) in w.iter_mut().zip(&grad_w) {
                    *wj -= self.learning_rate * g;
                }
                *b -= self.learning_rate * grad_b;
            }
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> usize {
        argmax(&self.decision_function(x))
    }

    fn predict_proba(&self, _x: &[f64]) -> Option<Vec<f64>> {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Serializable model wrapper
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    NaiveBayes(MultinomialNb),
    LogisticRegression(LogisticRegression),
    LinearSvm(LinearSvm),
}

impl ClassifierModel {
    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierModel::NaiveBayes(m) => m,
            ClassifierModel::LogisticRegression(m) => m,
            ClassifierModel::LinearSvm(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Classifier {
        match self {
            ClassifierModel::NaiveBayes(m) => m,
            ClassifierModel::LogisticRegression(m) => m,
            ClassifierModel::LinearSvm(m) => m,
        }
    }
}

impl Classifier for ClassifierModel {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> ScreenerResult<()> {
        self.inner_mut().fit(x, y, n_classes)
    }

    fn predict(&self, x: &[f64]) -> usize {
        self.inner().predict(x)
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>> {
        self.inner().predict_proba(x)
    }
}

/// Fresh, unfitted candidates in `CANDIDATE_NAMES` order.
pub fn candidate_models() -> Vec<ClassifierModel> {
    vec![
        ClassifierModel::NaiveBayes(MultinomialNb::new(1.0)),
        ClassifierModel::LogisticRegression(LogisticRegression::new(1.0, 1e-4, 300)),
        ClassifierModel::LinearSvm(LinearSvm::new(0.5, 1e-3, 300)),
    ]
}

/// A fitted model together with the fields its class indices stand for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedClassifier {
    pub classes: Vec<JobField>,
    pub n_features: usize,
    pub model: ClassifierModel,
}

impl TrainedClassifier {
    pub fn name(&self) -> &'static str {
        self.model.name()
    }

    /// Probabilities over `classes`, renormalized to sum to 1. Models without
    /// native probabilities put all mass on the predicted class.
    pub fn probabilities(&self, x: &[f64]) -> Vec<(JobField, f64)> {
        let raw = self.model.predict_proba(x).unwrap_or_else(|| {
            let predicted = self.model.predict(x);
            (0..self.classes.len())
                .map(|i| if i == predicted { 1.0 } else { 0.0 })
                .collect()
        });
        let total: f64 = raw.iter().filter(|p| p.is_finite()).sum();
        self.classes
            .iter()
            .zip(raw)
            .map(|(field, p)| {
                let p = if p.is_finite() { p } else { 0.0 };
                (*field, if total > 0.0 { p / total } else { 0.0 })
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_training_set(x: &[Vec<f64>], y: &[usize], n_classes: usize) -> ScreenerResult<usize> {
    if x.is_empty() || x.len() != y.len() {
        return Err(ScreenerError::Validation(format!(
            "training set needs matching non-empty rows and labels (rows={}, labels={})",
            x.len(),
            y.len()
        )));
    }
    if let Some(bad) = y.iter().find(|&&label| label >= n_classes) {
        return Err(ScreenerError::Validation(format!(
            "label index {bad} out of range for {n_classes} classes"
        )));
    }
    let n_features = x[0].len();
    if x.iter().any(|row| row.len() != n_features) {
        return Err(ScreenerError::Validation(
            "training rows have inconsistent feature counts".to_string(),
        ));
    }
    Ok(n_features)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        })
        .0
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![1.0 / values.len() as f64; values.len()];
    }
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
