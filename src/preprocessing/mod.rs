//! Feature cleaning, normalization and encoding.
//!
//! - [`GpaRepair`] / [`clean_gpa`]: the GPA column arrives either as a decimal
//!   GPA (`3,5` or `3.5`) or as a small fraction that has to be rescaled.
//! - [`clean_table`]: raw text cells to a typed [`FeatureTable`].
//! - [`NormalizationStats`]: per-feature mean/std and the z-score transform.
//! - [`OneHotEncoder`] / [`ColumnTransformer`]: model matrix construction.
//!
//! # Example
//!
//! ```
//! use stress_risk::preprocessing::clean_gpa;
//!
//! assert_eq!(clean_gpa(Some("3,5")), Some(3.5));
//! assert_eq!(clean_gpa(Some("0.125")), Some(2.5));
//! assert_eq!(clean_gpa(Some("0.5")), Some(4.0));
//! assert_eq!(clean_gpa(Some("n/a")), None);
//! assert_eq!(clean_gpa(None), None);
//! ```

mod encoding;
mod scaling;

pub use encoding::{ColumnTransformer, OneHotEncoder};
pub use scaling::{FeatureStats, NormalizationStats};

use crate::data::{CategoricalFeature, FeatureTable, NumericFeature, RawTable, LABEL_COLUMN};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Repair rule for the GPA column.
///
/// Values below 1.0 are taken to be a fractional encoding stored in the GPA
/// column by mistake and are multiplied by `factor`, then clamped to
/// `max_gpa`. Values of 1.0 and above pass through. The rule is empirical;
/// [`GpaRepair::disabled`] keeps every parsed value as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpaRepair {
    /// Multiplier applied to values below 1.0.
    pub factor: f64,
    /// Upper clamp after rescaling.
    pub max_gpa: f64,
    /// Whether the rescale applies at all.
    pub enabled: bool,
}

impl Default for GpaRepair {
    fn default() -> Self {
        Self {
            factor: 20.0,
            max_gpa: 4.0,
            enabled: true,
        }
    }
}

impl GpaRepair {
    /// A rule that parses but never rescales.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Applies the rescale to an already parsed value.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if self.enabled && value < 1.0 {
            (value * self.factor).min(self.max_gpa)
        } else {
            value
        }
    }

    /// Cleans one raw GPA cell; `None` means missing.
    #[must_use]
    pub fn clean(&self, raw: Option<&str>) -> Option<f64> {
        let normalized = raw?.trim().replace(',', ".");
        let value = parse_finite(&normalized)?;
        Some(self.apply(value))
    }
}

/// Cleans one raw GPA cell with the default [`GpaRepair`].
#[must_use]
pub fn clean_gpa(raw: Option<&str>) -> Option<f64> {
    GpaRepair::default().clean(raw)
}

/// Coerces a raw numeric cell; unparseable or missing cells become NaN.
///
/// No decimal-comma repair happens here; that is specific to GPA.
#[must_use]
pub fn coerce_numeric(raw: Option<&str>) -> f64 {
    raw.and_then(|cell| parse_finite(cell.trim()))
        .unwrap_or(f64::NAN)
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Cleans a raw table with the default GPA rule.
///
/// # Errors
///
/// See [`clean_table_with`].
pub fn clean_table(raw: &RawTable) -> Result<FeatureTable> {
    clean_table_with(raw, &GpaRepair::default())
}

/// Turns raw text cells into a typed [`FeatureTable`].
///
/// Every numeric and categorical column is required except GPA, which is
/// skipped when the header is absent. The label column is read when present.
/// Missing categorical cells and labels become empty strings.
///
/// # Errors
///
/// Returns [`crate::error::StressError::MissingColumn`] if a required column
/// is absent.
pub fn clean_table_with(raw: &RawTable, gpa: &GpaRepair) -> Result<FeatureTable> {
    let mut numeric = Vec::with_capacity(NumericFeature::ALL.len());
    for feature in NumericFeature::ALL {
        if feature.is_optional() && !raw.has_column(feature.header()) {
            tracing::info!(column = feature.header(), "optional column absent, skipping");
            continue;
        }
        let cells = raw.column(feature.header())?;
        let values: Vec<f64> = match feature {
            NumericFeature::Gpa => cells
                .into_iter()
                .map(|cell| gpa.clean(cell).unwrap_or(f64::NAN))
                .collect(),
            _ => cells.into_iter().map(coerce_numeric).collect(),
        };
        numeric.push((feature, values));
    }

    let mut categorical = Vec::with_capacity(CategoricalFeature::ALL.len());
    for feature in CategoricalFeature::ALL {
        let values: Vec<String> = raw
            .column(feature.header())?
            .into_iter()
            .map(|cell| cell.unwrap_or_default().to_string())
            .collect();
        categorical.push((feature, values));
    }

    let labels = if raw.has_column(LABEL_COLUMN) {
        Some(
            raw.column(LABEL_COLUMN)?
                .into_iter()
                .map(|cell| cell.unwrap_or_default().to_string())
                .collect(),
        )
    } else {
        None
    };

    FeatureTable::new(numeric, categorical, labels)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
