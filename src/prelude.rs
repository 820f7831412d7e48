//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use stress_risk::prelude::*;
//! ```

pub use crate::data::{FeatureTable, RawTable, HEALTHY_LABEL, STRESS_LABEL};
pub use crate::error::{Result, StressError};
pub use crate::inference::{predict_batch, predict_profile, Prediction, StudentProfile};
pub use crate::pipeline::{StressPipeline, TrainingConfig};
pub use crate::preprocessing::{clean_table, NormalizationStats};
pub use crate::primitives::Matrix;
pub use crate::traits::{Classifier, Transformer};
pub use crate::training::{train, TrainedModel};
pub use crate::tree::{DecisionTreeClassifier, RandomForestClassifier};
