//! Dataset overview and descriptive statistics.
//!
//! These are the numbers behind the overview and exploratory views: row and
//! class counts, and per-column summaries optionally filtered by label.

use super::{CategoricalFeature, FeatureTable, NumericFeature, HEALTHY_LABEL, STRESS_LABEL};
use serde::Serialize;
use std::collections::BTreeMap;

/// Row and category counts for a labelled table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Number of rows.
    pub n_rows: usize,
    /// Rows per label value.
    pub label_counts: BTreeMap<String, usize>,
    /// Rows per gender value.
    pub gender_counts: BTreeMap<String, usize>,
}

impl DatasetSummary {
    /// Summarizes a table.
    #[must_use]
    pub fn from_table(table: &FeatureTable) -> Self {
        Self {
            n_rows: table.n_rows(),
            label_counts: count_values(table.labels().unwrap_or(&[])),
            gender_counts: count_values(table.categorical(CategoricalFeature::Gender)),
        }
    }

    /// Rows labelled healthy.
    #[must_use]
    pub fn healthy(&self) -> usize {
        self.label_counts.get(HEALTHY_LABEL).copied().unwrap_or(0)
    }

    /// Rows labelled stress risk.
    #[must_use]
    pub fn at_risk(&self) -> usize {
        self.label_counts.get(STRESS_LABEL).copied().unwrap_or(0)
    }
}

fn count_values(values: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts
}

/// Descriptive statistics for a numeric column (missing values excluded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    /// Feature described.
    pub feature: NumericFeature,
    /// Number of non-missing values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Sample standard deviation (N-1).
    pub std: f64,
    /// Minimum value.
    pub min: f64,
    /// Median value.
    pub median: f64,
    /// Maximum value.
    pub max: f64,
}

/// Describes every numeric column, optionally only rows with `label`.
///
/// Statistics of an empty selection are NaN with `count == 0`.
///
/// # Examples
///
/// ```
/// use stress_risk::data::{describe, CategoricalFeature, FeatureTable, NumericFeature};
///
/// let categorical = CategoricalFeature::ALL
///     .into_iter()
///     .map(|f| (f, vec!["x".to_string(); 3]))
///     .collect();
/// let numeric = vec![(NumericFeature::Age, vec![18.0, 20.0, 22.0])];
/// let table = FeatureTable::new(numeric, categorical, None).expect("valid table");
///
/// let stats = describe(&table, None);
/// assert_eq!(stats[0].median, 20.0);
/// assert!((stats[0].std - 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn describe(table: &FeatureTable, label: Option<&str>) -> Vec<ColumnStats> {
    let keep: Vec<bool> = match (label, table.labels()) {
        (Some(wanted), Some(labels)) => labels.iter().map(|l| l == wanted).collect(),
        (Some(_), None) => vec![false; table.n_rows()],
        (None, _) => vec![true; table.n_rows()],
    };

    table
        .numeric_features()
        .into_iter()
        .map(|feature| {
            let column = table.numeric(feature).unwrap_or(&[]);
            let mut values: Vec<f64> = column
                .iter()
                .zip(&keep)
                .filter(|(v, k)| **k && !v.is_nan())
                .map(|(&v, _)| v)
                .collect();
            values.sort_by(f64::total_cmp);
            column_stats(feature, &values)
        })
        .collect()
}

fn column_stats(feature: NumericFeature, sorted: &[f64]) -> ColumnStats {
    let count = sorted.len();
    if count == 0 {
        return ColumnStats {
            feature,
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            median: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    ColumnStats {
        feature,
        count,
        mean,
        std,
        min: sorted[0],
        median,
        max: sorted[count - 1],
    }
}
