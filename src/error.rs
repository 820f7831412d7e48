//! Error types for stress-risk operations.
//!
//! Recoverable data problems (unparseable cells, unseen categories, corrupt
//! artifacts) never reach this type; they are absorbed where they occur.
//! Everything here is fatal to the request that produced it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stress-risk operations.
///
/// # Examples
///
/// ```
/// use stress_risk::error::StressError;
///
/// let err = StressError::missing_column("IPK");
/// assert!(err.to_string().contains("IPK"));
/// ```
#[derive(Debug, Error)]
pub enum StressError {
    /// The dataset file does not exist.
    #[error("dataset file not found: {}", path.display())]
    DatasetNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// A column the schema requires is absent from the input header.
    #[error("expected column '{column}' is missing from the dataset")]
    MissingColumn {
        /// Header name of the missing column
        column: String,
    },

    /// The delimited file could not be parsed.
    #[error("failed to read dataset: {0}")]
    Csv(String),

    /// I/O error (permission denied, short write, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Matrix/table dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Operation needs at least one value/row.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// A feature's standard deviation is zero or not finite, so it cannot be z-scored.
    #[error("cannot normalize '{feature}': standard deviation is {std}")]
    ZeroVariance {
        /// Feature header name
        feature: String,
        /// Offending standard deviation
        std: f64,
    },

    /// Invalid hyperparameter value provided.
    #[error("invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Model used before `fit`.
    #[error("{0} is not fitted")]
    NotFitted(&'static str),

    /// The fitted model does not know one of the two expected class labels.
    #[error("class label '{label}' not found among model classes {classes:?}")]
    MissingClassLabel {
        /// Label that was looked up
        label: String,
        /// Labels the model actually knows
        classes: Vec<String>,
    },

    /// A submitted profile field is outside its accepted range.
    #[error("invalid profile: {field} = {value}, expected {constraint}")]
    InvalidProfile {
        /// Field name
        field: &'static str,
        /// Provided value
        value: String,
        /// Accepted range
        constraint: &'static str,
    },

    /// A prediction batch has the wrong number of profiles.
    #[error("invalid batch: {size} profiles submitted, expected 1..={max}")]
    InvalidBatch {
        /// Submitted batch size
        size: usize,
        /// Largest accepted batch
        max: usize,
    },
}

impl StressError {
    /// Create a missing-column error
    #[must_use]
    pub fn missing_column(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// True for the conditions a user can fix by supplying data (missing file or column).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DatasetNotFound { .. } | Self::MissingColumn { .. } | Self::Csv(_)
        )
    }
}

impl From<csv::Error> for StressError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for StressError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for StressError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, StressError>;
