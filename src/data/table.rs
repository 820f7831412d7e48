//! Typed, column-oriented feature table.

use super::{CategoricalFeature, NumericFeature};
use crate::error::{Result, StressError};

/// Cleaned survey data: numeric columns as `f64` (NaN = missing),
/// categorical columns as strings, optional labels.
///
/// Numeric columns are kept in [`NumericFeature::ALL`] order and categorical
/// columns in [`CategoricalFeature::ALL`] order regardless of the order they
/// were supplied in.
///
/// # Examples
///
/// ```
/// use stress_risk::data::{CategoricalFeature, FeatureTable, NumericFeature};
///
/// let numeric = vec![(NumericFeature::Age, vec![20.0, 22.0])];
/// let categorical = CategoricalFeature::ALL
///     .into_iter()
///     .map(|f| (f, vec!["a".to_string(), "b".to_string()]))
///     .collect();
/// let table = FeatureTable::new(numeric, categorical, None).expect("valid table");
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.numeric(NumericFeature::Age), Some(&[20.0, 22.0][..]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    numeric: Vec<(NumericFeature, Vec<f64>)>,
    // one column per CategoricalFeature::ALL entry, same order
    categorical: Vec<Vec<String>>,
    labels: Option<Vec<String>>,
    n_rows: usize,
}

impl FeatureTable {
    /// Creates a table from typed columns.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, a feature is
    /// supplied twice, or a categorical feature is missing.
    pub fn new(
        mut numeric: Vec<(NumericFeature, Vec<f64>)>,
        mut categorical: Vec<(CategoricalFeature, Vec<String>)>,
        labels: Option<Vec<String>>,
    ) -> Result<Self> {
        numeric.sort_by_key(|(f, _)| *f);
        categorical.sort_by_key(|(f, _)| *f);

        if numeric.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(StressError::Csv("numeric feature supplied twice".into()));
        }
        if categorical.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(StressError::Csv("categorical feature supplied twice".into()));
        }
        for feature in CategoricalFeature::ALL {
            if !categorical.iter().any(|(f, _)| *f == feature) {
                return Err(StressError::missing_column(feature.header()));
            }
        }

        let n_rows = categorical[0].1.len();
        let lengths = numeric
            .iter()
            .map(|(_, c)| c.len())
            .chain(categorical.iter().map(|(_, c)| c.len()))
            .chain(labels.iter().map(Vec::len));
        for len in lengths {
            if len != n_rows {
                return Err(StressError::dimension_mismatch("rows", n_rows, len));
            }
        }

        Ok(Self {
            numeric,
            categorical: categorical.into_iter().map(|(_, c)| c).collect(),
            labels,
            n_rows,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the numeric features present, in model column order.
    #[must_use]
    pub fn numeric_features(&self) -> Vec<NumericFeature> {
        self.numeric.iter().map(|(f, _)| *f).collect()
    }

    /// Whether a numeric feature is present.
    #[must_use]
    pub fn has_numeric(&self, feature: NumericFeature) -> bool {
        self.numeric.iter().any(|(f, _)| *f == feature)
    }

    /// Returns a numeric column.
    #[must_use]
    pub fn numeric(&self, feature: NumericFeature) -> Option<&[f64]> {
        self.numeric
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, c)| c.as_slice())
    }

    /// Returns a numeric column for in-place updates.
    pub fn numeric_mut(&mut self, feature: NumericFeature) -> Option<&mut [f64]> {
        self.numeric
            .iter_mut()
            .find(|(f, _)| *f == feature)
            .map(|(_, c)| c.as_mut_slice())
    }

    /// Returns a categorical column.
    #[must_use]
    pub fn categorical(&self, feature: CategoricalFeature) -> &[String] {
        &self.categorical[feature.index()]
    }

    /// Returns the labels, if the table has them.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Returns a copy without the label column.
    #[must_use]
    pub fn without_labels(&self) -> Self {
        Self {
            labels: None,
            ..self.clone()
        }
    }

    /// Builds a new table from the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(column: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| column[i].clone()).collect()
        }

        Self {
            numeric: self
                .numeric
                .iter()
                .map(|(f, c)| (*f, pick(c, indices)))
                .collect(),
            categorical: self
                .categorical
                .iter()
                .map(|c| pick(c, indices))
                .collect(),
            labels: self.labels.as_ref().map(|l| pick(l, indices)),
            n_rows: indices.len(),
        }
    }
}
