//! Seeded train/test split over label indices.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::errors::{ScreenerError, ScreenerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    Stratified,
    Random,
}

/// Row indices into the prepared dataset.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
    pub strategy: SplitStrategy,
}

/// Splits `labels` into train and test rows with `test_fraction` held out.
///
/// Stratifies when every class has at least two rows and both halves are
/// large enough to hold one row of each class; otherwise shuffles and cuts.
pub fn train_test_split(labels: &[usize], test_fraction: f64, seed: u64) -> ScreenerResult<TrainTestSplit> {
    let n = labels.len();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(ScreenerError::Validation(format!(
            "cannot split {n} rows with test fraction {test_fraction}"
        )));
    }
    let n_train = n - n_test;

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(row);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let n_classes = by_class.len();
    let stratify = by_class.values().all(|rows| rows.len() >= 2)
        && n_test >= n_classes
        && n_train >= n_classes;

    if !stratify {
        let mut rows: Vec<usize> = (0..n).collect();
        rows.shuffle(&mut rng);
        let train = rows.split_off(n_test);
        return Ok(TrainTestSplit {
            train,
            test: rows,
            strategy: SplitStrategy::Random,
        });
    }

    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for rows in by_class.values_mut() {
        rows.shuffle(&mut rng);
        let count = rows.len();
        let take = ((count as f64 * test_fraction).round() as usize).clamp(1, count - 1);
        test.extend_from_slice(&rows[..take]);
        train.extend_from_slice(&rows[take..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(TrainTestSplit {
        train,
        test,
        strategy: SplitStrategy::Stratified,
    })
}
