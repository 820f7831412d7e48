//! Normalization statistics and the z-score transform.

use crate::data::{FeatureTable, NumericFeature};
use crate::error::{Result, StressError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean and sample standard deviation of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Mean of the non-missing values.
    pub mean: f64,
    /// Sample standard deviation (N-1) of the non-missing values.
    pub std: f64,
}

impl FeatureStats {
    /// Computes stats over `values`, ignoring NaN.
    ///
    /// Returns `None` if no value is present. A single value has `std == 0`.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = present.len();
        if n == 0 {
            return None;
        }

        let mean = present.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let sum_sq: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        Some(Self { mean, std })
    }

    /// Whether the std can be divided by.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.mean.is_finite() && self.std.is_finite() && self.std > 0.0
    }
}

/// Per-feature normalization statistics computed on the cleaned, unsplit corpus.
///
/// The same instance must serve every inference call made against the model
/// trained alongside it.
///
/// # Example
///
/// ```
/// use stress_risk::data::NumericFeature;
/// use stress_risk::preprocessing::{FeatureStats, NormalizationStats};
///
/// let stats = NormalizationStats::from_stats([(
///     NumericFeature::SleepHours,
///     FeatureStats { mean: 6.0, std: 2.0 },
/// )]);
/// let z = stats.normalize_value(NumericFeature::SleepHours, 9.0).expect("usable stats");
/// assert!((z - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizationStats {
    features: BTreeMap<NumericFeature, FeatureStats>,
}

impl NormalizationStats {
    /// Computes stats for every normalized numeric feature in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::EmptyInput`] if a feature has no non-missing value.
    pub fn fit(table: &FeatureTable) -> Result<Self> {
        let mut features = BTreeMap::new();
        for feature in table.numeric_features() {
            if !feature.is_normalized() {
                continue;
            }
            let column = table.numeric(feature).unwrap_or(&[]);
            let stats = FeatureStats::from_values(column)
                .ok_or_else(|| StressError::empty_input(feature.header()))?;
            tracing::debug!(
                feature = feature.header(),
                mean = stats.mean,
                std = stats.std,
                "normalization stats"
            );
            features.insert(feature, stats);
        }
        Ok(Self { features })
    }

    /// Builds stats from explicit values.
    pub fn from_stats(stats: impl IntoIterator<Item = (NumericFeature, FeatureStats)>) -> Self {
        Self {
            features: stats.into_iter().collect(),
        }
    }

    /// Returns the stats of one feature.
    #[must_use]
    pub fn get(&self, feature: NumericFeature) -> Option<FeatureStats> {
        self.features.get(&feature).copied()
    }

    /// Features covered, in model column order.
    #[must_use]
    pub fn features(&self) -> Vec<NumericFeature> {
        self.features.keys().copied().collect()
    }

    /// Number of features covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if no feature is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Checks that every std is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::ZeroVariance`] for the first unusable feature.
    pub fn validate(&self) -> Result<()> {
        for (feature, stats) in &self.features {
            if !stats.is_usable() {
                return Err(StressError::ZeroVariance {
                    feature: feature.header().to_string(),
                    std: stats.std,
                });
            }
        }
        Ok(())
    }

    /// Z-scores a single value. NaN stays NaN.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::MissingColumn`] if the feature has no stats and
    /// [`StressError::ZeroVariance`] if its std cannot be divided by.
    pub fn normalize_value(&self, feature: NumericFeature, value: f64) -> Result<f64> {
        let stats = self
            .get(feature)
            .ok_or_else(|| StressError::missing_column(feature.header()))?;
        if !stats.is_usable() {
            return Err(StressError::ZeroVariance {
                feature: feature.header().to_string(),
                std: stats.std,
            });
        }
        Ok((value - stats.mean) / stats.std)
    }

    /// Returns a copy of `table` with every covered feature z-scored.
    ///
    /// # Errors
    ///
    /// Returns an error if a covered feature is absent from the table or
    /// has unusable stats. Nothing is modified in that case.
    pub fn transform(&self, table: &FeatureTable) -> Result<FeatureTable> {
        self.validate()?;
        let mut out = table.clone();
        for (&feature, stats) in &self.features {
            let column = out
                .numeric_mut(feature)
                .ok_or_else(|| StressError::missing_column(feature.header()))?;
            for value in column.iter_mut() {
                *value = (*value - stats.mean) / stats.std;
            }
        }
        Ok(out)
    }
}
