//! Random forest classifier.

use super::helpers::{bootstrap_sample, normalize_in_place};
use super::{check_width, validate_training_data, DecisionTreeClassifier, MaxFeatures};
use crate::error::{Result, StressError};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random Forest classifier.
///
/// Each tree is fitted on a bootstrap sample of the rows and considers a
/// random subset of features at every split. Probabilities are the mean of
/// the per-tree leaf distributions.
///
/// Tree `i` draws from a generator seeded with `random_state + i`, so a
/// fixed seed gives the same forest regardless of thread scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    max_features: MaxFeatures,
    random_state: Option<u64>,
    n_features: Option<usize>,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees in the forest
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            max_features: MaxFeatures::Sqrt,
            random_state: None,
            n_features: None,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the per-split feature subsampling (default: sqrt).
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Number of trees requested.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTreeClassifier] {
        &self.trees
    }

    /// Number of classes seen during fit.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of features seen during fit.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// Checks every tree against the forest's feature width and class count.
    ///
    /// A forest decoded from bytes can carry splits on features it was never
    /// given; this catches them before prediction.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::NotFitted`] for an empty forest and the first
    /// tree's dimension error otherwise.
    pub fn check_shape(&self) -> Result<()> {
        let n_features = match self.n_features {
            Some(n) if !self.trees.is_empty() => n,
            _ => return Err(StressError::NotFitted("RandomForestClassifier")),
        };
        self.trees
            .iter()
            .try_for_each(|tree| tree.check_shape(n_features, self.n_classes))
    }

    /// Mean decrease in impurity per feature, summing to 1.
    ///
    /// Trees that never split are left out of the average. Returns `None`
    /// before fit.
    #[must_use]
    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        let n_features = self.n_features?;
        let mut total = vec![0.0; n_features];
        let mut n_split_trees = 0usize;

        for tree in &self.trees {
            let splits = tree.root().is_some_and(|r| r.n_leaves() > 1);
            if !splits {
                continue;
            }
            if let Some(importances) = tree.feature_importances() {
                for (t, v) in total.iter_mut().zip(importances) {
                    *t += v;
                }
                n_split_trees += 1;
            }
        }

        if n_split_trees > 0 {
            for t in &mut total {
                *t /= n_split_trees as f64;
            }
            normalize_in_place(&mut total);
        }
        Some(total)
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &Matrix<f64>, y: &[usize]) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(StressError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        let n_classes = validate_training_data(x, y)?;
        let n_samples = x.n_rows();
        let base_seed = self.random_state.unwrap_or_else(rand::random::<u64>);

        let template = {
            let tree = DecisionTreeClassifier::new().with_max_features(self.max_features);
            match self.max_depth {
                Some(depth) => tree.with_max_depth(depth),
                None => tree,
            }
        };

        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                let sample = bootstrap_sample(n_samples, &mut rng);
                let mut tree = template.clone();
                tree.fit_sample(x, y, sample, n_classes, &mut rng);
                tree
            })
            .collect();
        self.n_features = Some(x.n_cols());
        self.n_classes = n_classes;

        tracing::debug!(
            n_estimators = self.n_estimators,
            n_samples,
            n_classes,
            "random forest fitted"
        );
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        if self.trees.is_empty() {
            return Err(StressError::NotFitted("RandomForestClassifier"));
        }
        check_width(self.n_features, x)?;

        let per_tree: Vec<Matrix<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_proba(x))
            .collect::<Result<_>>()?;

        let mut sum = vec![0.0; x.n_rows() * self.n_classes];
        for proba in &per_tree {
            for (s, p) in sum.iter_mut().zip(proba.as_slice()) {
                *s += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        for s in &mut sum {
            *s /= n_trees;
        }

        Matrix::from_vec(x.n_rows(), self.n_classes, sum)
            .map_err(|_| StressError::dimension_mismatch("classes", self.n_classes, 0))
    }
}
