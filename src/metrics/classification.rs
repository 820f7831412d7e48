//! Classification metrics for evaluating classifier performance.
//!
//! Provides accuracy, precision, recall, F1-score, and confusion matrix
//! computation over class indices.

use crate::error::{Result, StressError};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Averaging strategy for multi-class metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Average {
    /// Calculate metrics for each label, return unweighted mean.
    Macro,
    /// Calculate metrics globally by counting total TP, FP, FN.
    Micro,
    /// Weighted mean by support (number of true instances per label).
    Weighted,
}

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use stress_risk::metrics::accuracy;
///
/// let y_true = vec![0, 1, 1, 0];
/// let y_pred = vec![0, 1, 0, 0];
/// assert!((accuracy(&y_pred, &y_true) - 0.75).abs() < 1e-12);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f64 / y_true.len() as f64
}

/// Per-class counts behind precision, recall and F1.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassCounts {
    tp: Vec<usize>,
    fp: Vec<usize>,
    fn_counts: Vec<usize>,
    support: Vec<usize>,
}

impl ClassCounts {
    fn new(y_pred: &[usize], y_true: &[usize], n_classes: usize) -> Self {
        let mut counts = Self {
            tp: vec![0; n_classes],
            fp: vec![0; n_classes],
            fn_counts: vec![0; n_classes],
            support: vec![0; n_classes],
        };
        for (&true_label, &pred_label) in y_true.iter().zip(y_pred.iter()) {
            counts.support[true_label] += 1;
            if true_label == pred_label {
                counts.tp[true_label] += 1;
            } else {
                counts.fp[pred_label] += 1;
                counts.fn_counts[true_label] += 1;
            }
        }
        counts
    }

    fn precision(&self, i: usize) -> f64 {
        ratio(self.tp[i], self.tp[i] + self.fp[i])
    }

    fn recall(&self, i: usize) -> f64 {
        ratio(self.tp[i], self.tp[i] + self.fn_counts[i])
    }

    fn f1(&self, i: usize) -> f64 {
        f1_from_prec_rec(self.precision(i), self.recall(i))
    }

    fn average(&self, average: Average, per_class: impl Fn(usize) -> f64, micro: f64) -> f64 {
        let n_classes = self.support.len();
        match average {
            Average::Micro => micro,
            Average::Macro => (0..n_classes).map(per_class).sum::<f64>() / n_classes as f64,
            Average::Weighted => {
                let total: usize = self.support.iter().sum();
                if total == 0 {
                    return 0.0;
                }
                (0..n_classes)
                    .map(|i| per_class(i) * self.support[i] as f64 / total as f64)
                    .sum()
            }
        }
    }

    fn totals(&self) -> (usize, usize, usize) {
        (
            self.tp.iter().sum(),
            self.fp.iter().sum(),
            self.fn_counts.iter().sum(),
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compute F1 score from precision and recall.
fn f1_from_prec_rec(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn n_classes_of(y_pred: &[usize], y_true: &[usize]) -> usize {
    y_true
        .iter()
        .chain(y_pred.iter())
        .max()
        .map_or(0, |&m| m + 1)
}

fn counts(y_pred: &[usize], y_true: &[usize]) -> ClassCounts {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");
    ClassCounts::new(y_pred, y_true, n_classes_of(y_pred, y_true))
}

/// Compute precision score: TP / (TP + FP).
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn precision(y_pred: &[usize], y_true: &[usize], average: Average) -> f64 {
    let c = counts(y_pred, y_true);
    let (tp, fp, _) = c.totals();
    c.average(average, |i| c.precision(i), ratio(tp, tp + fp))
}

/// Compute recall score: TP / (TP + FN).
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn recall(y_pred: &[usize], y_true: &[usize], average: Average) -> f64 {
    let c = counts(y_pred, y_true);
    let (tp, _, fn_total) = c.totals();
    c.average(average, |i| c.recall(i), ratio(tp, tp + fn_total))
}

/// Compute F1 score (harmonic mean of precision and recall).
///
/// F1 = 2 * (precision * recall) / (precision + recall)
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use stress_risk::metrics::{f1_score, Average};
///
/// let y_true = vec![0, 0, 0, 1];
/// let y_pred = vec![0, 0, 1, 1];
/// let f1 = f1_score(&y_pred, &y_true, Average::Weighted);
/// // class 0: p=1, r=2/3, f1=0.8 (support 3); class 1: p=0.5, r=1, f1=2/3 (support 1)
/// assert!((f1 - (0.8 * 0.75 + 2.0 / 3.0 * 0.25)).abs() < 1e-12);
/// ```
#[must_use]
pub fn f1_score(y_pred: &[usize], y_true: &[usize], average: Average) -> f64 {
    let c = counts(y_pred, y_true);
    let (tp, fp, fn_total) = c.totals();
    let micro = f1_from_prec_rec(ratio(tp, tp + fp), ratio(tp, tp + fn_total));
    c.average(average, |i| c.f1(i), micro)
}

/// Compute confusion matrix over a fixed number of classes.
///
/// Element `[i, j]` counts samples with true class `i` predicted as `j`.
/// Classes absent from both vectors still get a row and column.
///
/// # Errors
///
/// Returns [`StressError::DimensionMismatch`] if the vectors have different
/// lengths or a class index is `>= n_classes`.
///
/// # Examples
///
/// ```
/// use stress_risk::metrics::confusion_matrix;
///
/// let cm = confusion_matrix(&[0, 0, 0], &[0, 1, 0], 2).expect("valid labels");
/// assert_eq!(cm.shape(), (2, 2));
/// assert_eq!(cm.get(1, 0), 1);
/// assert_eq!(cm.get(1, 1), 0);
/// ```
pub fn confusion_matrix(
    y_pred: &[usize],
    y_true: &[usize],
    n_classes: usize,
) -> Result<Matrix<usize>> {
    if y_pred.len() != y_true.len() {
        return Err(StressError::dimension_mismatch(
            "predictions",
            y_true.len(),
            y_pred.len(),
        ));
    }

    let mut matrix = Matrix::filled(n_classes, n_classes, 0usize);
    for (&true_label, &pred_label) in y_true.iter().zip(y_pred.iter()) {
        let out_of_range = true_label.max(pred_label);
        if out_of_range >= n_classes {
            return Err(StressError::dimension_mismatch(
                "classes",
                n_classes,
                out_of_range + 1,
            ));
        }
        let count = matrix.get(true_label, pred_label);
        matrix.set(true_label, pred_label, count + 1);
    }
    Ok(matrix)
}

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class name
    pub label: String,
    /// TP / (TP + FP)
    pub precision: f64,
    /// TP / (TP + FN)
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
    /// Number of true instances
    pub support: usize,
}

/// Builds per-class metrics, one entry per name in `labels` (index order).
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty, or a class index
/// is `>= labels.len()`.
#[must_use]
pub fn classification_report(
    y_pred: &[usize],
    y_true: &[usize],
    labels: &[String],
) -> Vec<ClassMetrics> {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");
    let c = ClassCounts::new(y_pred, y_true, labels.len());
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| ClassMetrics {
            label: label.clone(),
            precision: c.precision(i),
            recall: c.recall(i),
            f1: c.f1(i),
            support: c.support[i],
        })
        .collect()
}
