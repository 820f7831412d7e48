//! One-hot encoding and model matrix assembly.

use crate::data::{CategoricalFeature, FeatureTable, NumericFeature};
use crate::error::{Result, StressError};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder for a single categorical column.
///
/// The vocabulary is the sorted set of values seen during fit. Values not in
/// the vocabulary encode to an all-zero block instead of failing.
///
/// # Examples
///
/// ```
/// use stress_risk::preprocessing::OneHotEncoder;
///
/// let mut encoder = OneHotEncoder::new();
/// encoder.fit(&["Sering".to_string(), "Jarang".to_string()]);
/// assert_eq!(encoder.categories(), Some(&["Jarang".to_string(), "Sering".to_string()][..]));
/// assert_eq!(encoder.encode("Sering").expect("fitted"), vec![0.0, 1.0]);
/// assert_eq!(encoder.encode("Kadang").expect("fitted"), vec![0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Option<Vec<String>>,
}

impl OneHotEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns the vocabulary.
    pub fn fit(&mut self, values: &[String]) {
        let vocabulary: BTreeSet<&String> = values.iter().collect();
        self.categories = Some(vocabulary.into_iter().cloned().collect());
    }

    /// Returns the learned vocabulary.
    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    /// Number of output columns (0 before fit).
    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.categories.as_ref().map_or(0, Vec::len)
    }

    /// Appends the encoding of `value` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::NotFitted`] before [`OneHotEncoder::fit`].
    pub fn encode_into(&self, value: &str, out: &mut Vec<f64>) -> Result<()> {
        let categories = self
            .categories
            .as_ref()
            .ok_or(StressError::NotFitted("OneHotEncoder"))?;
        let hit = categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok();
        out.extend((0..categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
        Ok(())
    }

    /// Encodes a single value.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::NotFitted`] before [`OneHotEncoder::fit`].
    pub fn encode(&self, value: &str) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.n_outputs());
        self.encode_into(value, &mut out)?;
        Ok(out)
    }
}

/// Builds the model matrix from a [`FeatureTable`].
///
/// Output columns are the numeric features present at fit time, in table
/// order and passed through unchanged, followed by one one-hot block per
/// categorical feature in [`CategoricalFeature::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric: Vec<NumericFeature>,
    encoders: Vec<(CategoricalFeature, OneHotEncoder)>,
}

impl ColumnTransformer {
    /// Creates an unfitted transformer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`Transformer::fit`] has been called.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.encoders.is_empty()
    }

    /// Numeric features passed through.
    #[must_use]
    pub fn numeric_features(&self) -> &[NumericFeature] {
        &self.numeric
    }

    /// Encoder fitted for a categorical feature.
    #[must_use]
    pub fn encoder(&self, feature: CategoricalFeature) -> Option<&OneHotEncoder> {
        self.encoders
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, e)| e)
    }

    /// Width of the model matrix.
    #[must_use]
    pub fn n_features_out(&self) -> usize {
        self.numeric.len()
            + self
                .encoders
                .iter()
                .map(|(_, e)| e.n_outputs())
                .sum::<usize>()
    }

    /// Output column names: `num__<header>` and `cat__<header>_<value>`.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        let numeric = self.numeric.iter().map(|f| format!("num__{}", f.header()));
        let categorical = self.encoders.iter().flat_map(|(feature, encoder)| {
            encoder
                .categories()
                .unwrap_or(&[])
                .iter()
                .map(move |value| format!("cat__{}_{value}", feature.header()))
        });
        numeric.chain(categorical).collect()
    }
}

impl Transformer for ColumnTransformer {
    fn fit(&mut self, table: &FeatureTable) -> Result<()> {
        if table.n_rows() == 0 {
            return Err(StressError::empty_input("column transformer fit"));
        }
        self.numeric = table.numeric_features();
        self.encoders = CategoricalFeature::ALL
            .into_iter()
            .map(|feature| {
                let mut encoder = OneHotEncoder::new();
                encoder.fit(table.categorical(feature));
                (feature, encoder)
            })
            .collect();
        Ok(())
    }

    fn transform(&self, table: &FeatureTable) -> Result<Matrix<f64>> {
        if !self.is_fitted() {
            return Err(StressError::NotFitted("ColumnTransformer"));
        }

        let numeric: Vec<&[f64]> = self
            .numeric
            .iter()
            .map(|&f| {
                table
                    .numeric(f)
                    .ok_or_else(|| StressError::missing_column(f.header()))
            })
            .collect::<Result<_>>()?;
        let categorical: Vec<(&[String], &OneHotEncoder)> = self
            .encoders
            .iter()
            .map(|(f, e)| (table.categorical(*f), e))
            .collect();

        let n_rows = table.n_rows();
        let n_cols = self.n_features_out();
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in 0..n_rows {
            data.extend(numeric.iter().map(|column| column[row]));
            for (column, encoder) in &categorical {
                encoder.encode_into(&column[row], &mut data)?;
            }
        }

        let len = data.len();
        Matrix::from_vec(n_rows, n_cols, data)
            .map_err(|_| StressError::dimension_mismatch("model matrix cells", n_rows * n_cols, len))
    }
}
