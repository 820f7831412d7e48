//! The fitted model: column transform composed with a random forest.
//!
//! [`StressPipeline`] takes a normalized [`FeatureTable`], builds the model
//! matrix with its [`ColumnTransformer`] and hands it to the forest. Class
//! labels are kept as strings in sorted order; callers resolve a label to
//! its probability column by name, never by position.

use crate::data::{FeatureTable, NumericFeature, LABEL_COLUMN};
use crate::error::{Result, StressError};
use crate::preprocessing::{ColumnTransformer, GpaRepair};
use crate::primitives::Matrix;
use crate::traits::{argmax, Classifier, Transformer};
use crate::tree::RandomForestClassifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hyperparameters and split recipe for one training run.
///
/// # Examples
///
/// ```
/// use stress_risk::pipeline::TrainingConfig;
///
/// let config = TrainingConfig::default().with_n_estimators(50).with_max_depth(3);
/// assert_eq!(config.n_estimators(), 50);
/// assert_eq!(config.random_state(), 42);
/// config.validate().expect("valid config");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    test_size: f64,
    random_state: u64,
    n_estimators: usize,
    max_depth: usize,
    gpa_repair: GpaRepair,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            n_estimators: 200,
            max_depth: 4,
            gpa_repair: GpaRepair::default(),
        }
    }
}

impl TrainingConfig {
    /// Fraction of labelled rows held out for evaluation.
    #[must_use]
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Seed for the split and the forest.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    /// Number of trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Maximum tree depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// GPA repair rule applied by the cleaner.
    #[must_use]
    pub fn with_gpa_repair(mut self, gpa_repair: GpaRepair) -> Self {
        self.gpa_repair = gpa_repair;
        self
    }

    /// Held-out fraction.
    #[must_use]
    pub fn test_size(&self) -> f64 {
        self.test_size
    }

    /// Split and forest seed.
    #[must_use]
    pub fn random_state(&self) -> u64 {
        self.random_state
    }

    /// Number of trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Maximum tree depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// GPA repair rule.
    #[must_use]
    pub fn gpa_repair(&self) -> &GpaRepair {
        &self.gpa_repair
    }

    /// Checks hyperparameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::InvalidHyperparameter`] for the first value out
    /// of range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |param: &str, value: String, constraint: &str| {
            Err(StressError::InvalidHyperparameter {
                param: param.to_string(),
                value,
                constraint: constraint.to_string(),
            })
        };
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return invalid("test_size", self.test_size.to_string(), "0 < test_size < 1");
        }
        if self.n_estimators == 0 {
            return invalid("n_estimators", "0".to_string(), ">= 1");
        }
        if self.max_depth == 0 {
            return invalid("max_depth", "0".to_string(), ">= 1");
        }
        Ok(())
    }
}

/// A named feature importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Transformed feature name (`num__…` or `cat__…`)
    pub name: String,
    /// Mean decrease in impurity, all features summing to 1
    pub importance: f64,
}

/// Column transform + random forest + class labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressPipeline {
    transformer: ColumnTransformer,
    forest: RandomForestClassifier,
    classes: Vec<String>,
}

impl StressPipeline {
    /// Creates an unfitted pipeline from the forest settings in `config`.
    #[must_use]
    pub fn new(config: &TrainingConfig) -> Self {
        Self {
            transformer: ColumnTransformer::new(),
            forest: RandomForestClassifier::new(config.n_estimators())
                .with_max_depth(config.max_depth())
                .with_random_state(config.random_state()),
            classes: Vec::new(),
        }
    }

    /// Assembles a pipeline from already fitted parts.
    ///
    /// `classes[i]` names the forest's class index `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if a part is unfitted, the class count or width does
    /// not match the forest, or a tree splits on a feature outside the width.
    pub fn from_parts(
        transformer: ColumnTransformer,
        forest: RandomForestClassifier,
        classes: Vec<String>,
    ) -> Result<Self> {
        if !transformer.is_fitted() {
            return Err(StressError::NotFitted("ColumnTransformer"));
        }
        if forest.trees().is_empty() {
            return Err(StressError::NotFitted("RandomForestClassifier"));
        }
        if forest.n_classes() != classes.len() {
            return Err(StressError::dimension_mismatch(
                "classes",
                forest.n_classes(),
                classes.len(),
            ));
        }
        if forest.n_features() != Some(transformer.n_features_out()) {
            return Err(StressError::dimension_mismatch(
                "features",
                transformer.n_features_out(),
                forest.n_features().unwrap_or(0),
            ));
        }
        forest.check_shape()?;
        Ok(Self {
            transformer,
            forest,
            classes,
        })
    }

    /// Fits the transform and the forest on a labelled, normalized table.
    ///
    /// Class labels are the sorted distinct values of the label column.
    ///
    /// # Errors
    ///
    /// Returns an error if the table has no labels or fitting fails.
    pub fn fit(&mut self, table: &FeatureTable) -> Result<()> {
        let labels = table
            .labels()
            .ok_or_else(|| StressError::missing_column(LABEL_COLUMN))?;
        let classes: Vec<String> = labels
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        let y: Vec<usize> = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or_default())
            .collect();

        let x = self.transformer.fit_transform(table)?;
        self.forest.fit(&x, &y)?;
        self.classes = classes;

        tracing::info!(
            n_samples = x.n_rows(),
            n_features = x.n_cols(),
            classes = ?self.classes,
            "pipeline fitted"
        );
        Ok(())
    }

    /// Whether [`StressPipeline::fit`] has completed.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Class labels in probability-column order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Numeric features the model was fit on.
    #[must_use]
    pub fn numeric_features(&self) -> &[NumericFeature] {
        self.transformer.numeric_features()
    }

    /// The fitted column transform.
    #[must_use]
    pub fn transformer(&self) -> &ColumnTransformer {
        &self.transformer
    }

    /// The fitted forest.
    #[must_use]
    pub fn forest(&self) -> &RandomForestClassifier {
        &self.forest
    }

    /// Class probabilities, one row per table row.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted or a fitted column is missing.
    pub fn predict_proba(&self, table: &FeatureTable) -> Result<Matrix<f64>> {
        if !self.is_fitted() {
            return Err(StressError::NotFitted("StressPipeline"));
        }
        let x = self.transformer.transform(table)?;
        self.forest.predict_proba(&x)
    }

    /// Predicted class index per row.
    ///
    /// # Errors
    ///
    /// Same as [`StressPipeline::predict_proba`].
    pub fn predict_indices(&self, table: &FeatureTable) -> Result<Vec<usize>> {
        let proba = self.predict_proba(table)?;
        Ok(proba.rows().map(argmax).collect())
    }

    /// Predicted label per row.
    ///
    /// # Errors
    ///
    /// Same as [`StressPipeline::predict_proba`].
    pub fn predict(&self, table: &FeatureTable) -> Result<Vec<String>> {
        Ok(self
            .predict_indices(table)?
            .into_iter()
            .map(|i| self.classes[i].clone())
            .collect())
    }

    /// Output column names of the transform.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        self.transformer.feature_names()
    }

    /// Named importances, most important first.
    ///
    /// Returns `None` before fit.
    #[must_use]
    pub fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        let importances = self.forest.feature_importances()?;
        let mut named: Vec<FeatureImportance> = self
            .feature_names()
            .into_iter()
            .zip(importances)
            .map(|(name, importance)| FeatureImportance { name, importance })
            .collect();
        named.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        Some(named)
    }

    /// The `n` most important features.
    #[must_use]
    pub fn top_features(&self, n: usize) -> Vec<FeatureImportance> {
        let mut all = self.feature_importances().unwrap_or_default();
        all.truncate(n);
        all
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
