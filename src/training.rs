//! Training and evaluation of the stress-risk model.
//!
//! One run takes a cleaned table and produces the matched triple of
//! normalization stats, fitted pipeline and held-out evaluation:
//!
//! 1. rows with an empty label are dropped
//! 2. stats are computed over every remaining row (before the split)
//! 3. the normalized table is split with the seeded shuffle
//! 4. the pipeline is fitted on the training rows and scored on the rest

use crate::data::{FeatureTable, HEALTHY_LABEL, STRESS_LABEL};
use crate::error::{Result, StressError};
use crate::metrics::{accuracy, classification_report, confusion_matrix, f1_score, Average, ClassMetrics};
use crate::model_selection::train_test_split;
use crate::pipeline::{StressPipeline, TrainingConfig};
use crate::preprocessing::NormalizationStats;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Held-out performance of a fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSnapshot {
    /// Fraction of held-out rows predicted correctly
    pub accuracy: f64,
    /// Support-weighted F1 over the classes
    pub weighted_f1: f64,
    /// Rows = true class, columns = predicted class, in `classes` order
    pub confusion_matrix: Matrix<usize>,
    /// Class labels indexing the confusion matrix
    pub classes: Vec<String>,
    /// Per-class precision, recall and F1
    pub per_class: Vec<ClassMetrics>,
    /// Number of held-out rows
    pub test_size: usize,
}

/// Everything one training run produces. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    /// Fitted pipeline
    pub pipeline: StressPipeline,
    /// Stats the pipeline's numeric inputs were normalized with
    pub stats: NormalizationStats,
    /// Held-out evaluation
    pub evaluation: EvaluationSnapshot,
}

/// Returns the rows that carry a non-empty label.
///
/// # Errors
///
/// Returns [`StressError::MissingColumn`] if the table has no label column.
pub fn labelled_rows(table: &FeatureTable) -> Result<FeatureTable> {
    let labels = table
        .labels()
        .ok_or_else(|| StressError::missing_column(crate::data::LABEL_COLUMN))?;
    let keep: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    let dropped = table.n_rows() - keep.len();
    if dropped > 0 {
        tracing::warn!(dropped, "rows without a label dropped");
        Ok(table.select_rows(&keep))
    } else {
        Ok(table.clone())
    }
}

/// Runs one full training pass.
///
/// # Errors
///
/// Returns an error for invalid hyperparameters, a missing label column,
/// too few rows to split, a feature with no values or zero variance, or a
/// fitting failure.
pub fn train(table: &FeatureTable, config: &TrainingConfig) -> Result<TrainedModel> {
    config.validate()?;
    let corpus = labelled_rows(table)?;
    let stats = NormalizationStats::fit(&corpus)?;
    let normalized = stats.transform(&corpus)?;

    let split = train_test_split(
        normalized.n_rows(),
        config.test_size(),
        Some(config.random_state()),
    )?;
    let train_rows = normalized.select_rows(&split.train);
    let test_rows = normalized.select_rows(&split.test);

    let mut pipeline = StressPipeline::new(config);
    pipeline.fit(&train_rows)?;
    let evaluation = evaluate(&pipeline, &test_rows)?;

    tracing::info!(
        rows = corpus.n_rows(),
        train = split.train.len(),
        test = split.test.len(),
        accuracy = evaluation.accuracy,
        weighted_f1 = evaluation.weighted_f1,
        "model trained"
    );
    Ok(TrainedModel {
        pipeline,
        stats,
        evaluation,
    })
}

/// Scores a fitted pipeline on a labelled, normalized table.
///
/// Metrics are indexed by the evaluation labels: both dataset labels, plus
/// any other label the pipeline or the table carries, sorted. A held-out
/// label the forest never saw gets its own row and is never predicted, so a
/// degenerate split still yields at least a 2x2 confusion matrix.
///
/// # Errors
///
/// Returns an error if the table is empty or unlabelled, or prediction fails.
pub fn evaluate(pipeline: &StressPipeline, table: &FeatureTable) -> Result<EvaluationSnapshot> {
    let labels = table
        .labels()
        .ok_or_else(|| StressError::missing_column(crate::data::LABEL_COLUMN))?;
    if labels.is_empty() {
        return Err(StressError::empty_input("evaluation rows"));
    }

    let classes = evaluation_labels(pipeline.classes(), labels);
    let index_of = |label: &str| {
        classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| StressError::MissingClassLabel {
                label: label.to_string(),
                classes: classes.clone(),
            })
    };
    let y_true: Vec<usize> = labels
        .iter()
        .map(|label| index_of(label.as_str()))
        .collect::<Result<_>>()?;
    let forest_to_label: Vec<usize> = pipeline
        .classes()
        .iter()
        .map(|c| index_of(c.as_str()))
        .collect::<Result<_>>()?;
    let y_pred: Vec<usize> = pipeline
        .predict_indices(table)?
        .into_iter()
        .map(|i| {
            forest_to_label
                .get(i)
                .copied()
                .ok_or_else(|| StressError::dimension_mismatch("classes", forest_to_label.len(), i + 1))
        })
        .collect::<Result<_>>()?;
    if classes.len() > pipeline.classes().len() {
        tracing::debug!(
            labels = ?classes,
            fitted = ?pipeline.classes(),
            "evaluating over labels the forest was not fitted on"
        );
    }

    Ok(EvaluationSnapshot {
        accuracy: accuracy(&y_pred, &y_true),
        weighted_f1: f1_score(&y_pred, &y_true, Average::Weighted),
        confusion_matrix: confusion_matrix(&y_pred, &y_true, classes.len())?,
        per_class: classification_report(&y_pred, &y_true, &classes),
        classes,
        test_size: y_true.len(),
    })
}

/// Sorted union of the two dataset labels, the fitted classes and the
/// held-out labels.
fn evaluation_labels(fitted: &[String], held_out: &[String]) -> Vec<String> {
    [STRESS_LABEL, HEALTHY_LABEL]
        .into_iter()
        .chain(fitted.iter().map(String::as_str))
        .chain(held_out.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Recomputes the evaluation of a persisted pipeline.
///
/// Rebuilds the same held-out rows a training run with `config` would have
/// used, normalizes them with the persisted `stats` and scores them.
///
/// # Errors
///
/// Same as [`train`] minus fitting.
pub fn evaluate_held_out(
    pipeline: &StressPipeline,
    stats: &NormalizationStats,
    table: &FeatureTable,
    config: &TrainingConfig,
) -> Result<EvaluationSnapshot> {
    let corpus = labelled_rows(table)?;
    let normalized = stats.transform(&corpus)?;
    let split = train_test_split(
        normalized.n_rows(),
        config.test_size(),
        Some(config.random_state()),
    )?;
    evaluate(pipeline, &normalized.select_rows(&split.test))
}

#[cfg(test)]
#[path = "training_tests.rs"]
mod tests;
