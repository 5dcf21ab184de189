use crate::models::ModelMetrics;

pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Accuracy plus precision and recall averaged over classes, weighted by
/// each class's support in `y_true`. A class with no predictions counts as
/// zero precision.
pub fn evaluate(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> ModelMetrics {
    let mut tp = vec![0usize; n_classes];
    let mut predicted = vec![0usize; n_classes];
    let mut support = vec![0usize; n_classes];

    for (&t, &p) in y_true.iter().zip(y_pred) {
        support[t] += 1;
        predicted[p] += 1;
        if t == p {
            tp[t] += 1;
        }
    }

    let total: usize = support.iter().sum();
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

    let (mut precision, mut recall) = (0.0, 0.0);
    if total > 0 {
        for c in 0..n_classes {
            let weight = support[c] as f64 / total as f64;
            precision += weight * ratio(tp[c], predicted[c]);
            recall += weight * ratio(tp[c], support[c]);
        }
    }

    ModelMetrics {
        accuracy: accuracy(y_true, y_pred),
        precision,
        recall,
    }
}
