//! Decision tree and random forest classifiers.
//!
//! This module implements:
//! - CART classification trees using Gini impurity
//! - Random Forest ensemble with bootstrap sampling and per-split feature
//!   subsampling
//!
//! Leaves keep the class distribution of the training samples that reached
//! them, so probabilities are available from a single tree as well as from
//! the forest average.
//!
//! # Example
//!
//! ```
//! use stress_risk::prelude::*;
//!
//! let x = Matrix::from_vec(6, 2, vec![
//!     0.0, 1.0,
//!     0.5, 0.0,
//!     1.0, 1.0,
//!     5.0, 0.0,
//!     5.5, 1.0,
//!     6.0, 0.0,
//! ]).expect("valid matrix");
//! let y = vec![0, 0, 0, 1, 1, 1];
//!
//! let mut forest = RandomForestClassifier::new(10)
//!     .with_max_depth(3)
//!     .with_random_state(42);
//! forest.fit(&x, &y).expect("fit should succeed");
//!
//! let proba = forest.predict_proba(&x).expect("fitted");
//! assert_eq!(proba.shape(), (6, 2));
//! ```

mod helpers;
mod random_forest;

pub use random_forest::RandomForestClassifier;

use crate::error::{Result, StressError};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use helpers::{class_counts, gini_from_counts, normalize_in_place};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Internal node in a decision tree.
///
/// Samples with `x[feature_idx] <= threshold` go left, everything else
/// (including NaN) goes right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f64,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold or NaN)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Fraction of training samples per class index
    pub distribution: Vec<f64>,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class distribution
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Number of leaves below this node.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }

    /// Checks that every split reads a feature below `n_features` and every
    /// leaf distributes over exactly `n_classes` classes.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::DimensionMismatch`] for the first node that
    /// breaks either bound.
    pub fn check_shape(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                TreeNode::Leaf(leaf) => {
                    if leaf.distribution.len() != n_classes {
                        return Err(StressError::dimension_mismatch(
                            "leaf classes",
                            n_classes,
                            leaf.distribution.len(),
                        ));
                    }
                }
                TreeNode::Node(internal) => {
                    if internal.feature_idx >= n_features {
                        return Err(StressError::DimensionMismatch {
                            expected: format!("split feature < {n_features}"),
                            actual: internal.feature_idx.to_string(),
                        });
                    }
                    pending.push(&*internal.left);
                    pending.push(&*internal.right);
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, sample: &[f64]) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf,
                TreeNode::Node(internal) => {
                    // NaN and absent values fail the comparison and go right
                    let goes_left = sample
                        .get(internal.feature_idx)
                        .is_some_and(|&v| v <= internal.threshold);
                    node = if goes_left {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// Number of candidate features considered at each split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MaxFeatures {
    /// Every feature
    #[default]
    All,
    /// `max(1, floor(sqrt(n_features)))`
    Sqrt,
    /// A fixed number, capped at `n_features`
    Count(usize),
}

impl MaxFeatures {
    /// Resolves the count for a given feature width.
    #[must_use]
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            Self::All => n_features,
            Self::Sqrt => (n_features as f64).sqrt() as usize,
            Self::Count(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and midpoints between
/// consecutive distinct values as thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: MaxFeatures,
    random_state: Option<u64>,
    /// Number of features the model was trained on (for validation)
    n_features: Option<usize>,
    n_classes: usize,
    importances: Vec<f64>,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::All,
            random_state: None,
            n_features: None,
            n_classes: 0,
            importances: Vec::new(),
        }
    }

    /// Sets the maximum depth of the tree.
    ///
    /// # Arguments
    ///
    /// * `depth` - Maximum depth (root has depth 0)
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split a node.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Sets how many features are considered per split.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets the seed used for feature subsampling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Root of the fitted tree.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Number of classes the tree distributes over.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of features seen during fit.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// Gini importances normalized to sum to 1 (all zero for a single leaf).
    #[must_use]
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.tree.as_ref().map(|_| self.importances.as_slice())
    }

    /// Checks a fitted tree against the width and class count it will be
    /// used with.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::NotFitted`] without a root, and a dimension
    /// error if the recorded shape, the importances or any node disagree.
    pub fn check_shape(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let root = self
            .tree
            .as_ref()
            .ok_or(StressError::NotFitted("DecisionTreeClassifier"))?;
        if self.n_features != Some(n_features) {
            return Err(StressError::dimension_mismatch(
                "features",
                n_features,
                self.n_features.unwrap_or(0),
            ));
        }
        if self.n_classes != n_classes {
            return Err(StressError::dimension_mismatch("classes", n_classes, self.n_classes));
        }
        if self.importances.len() != n_features {
            return Err(StressError::dimension_mismatch(
                "importances",
                n_features,
                self.importances.len(),
            ));
        }
        root.check_shape(n_features, n_classes)
    }

    /// Fits on the rows listed in `sample` (repeats allowed), with a fixed
    /// class count so every tree in an ensemble has the same output width.
    pub(crate) fn fit_sample(
        &mut self,
        x: &Matrix<f64>,
        y: &[usize],
        sample: Vec<usize>,
        n_classes: usize,
        rng: &mut StdRng,
    ) {
        let n_features = x.n_cols();
        let mut builder = TreeBuilder {
            x,
            y,
            n_classes,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features.resolve(n_features),
            importances: vec![0.0; n_features],
            rng,
        };
        let root = builder.build(sample, 0);
        let mut importances = builder.importances;
        normalize_in_place(&mut importances);

        self.tree = Some(root);
        self.n_features = Some(n_features);
        self.n_classes = n_classes;
        self.importances = importances;
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &Matrix<f64>, y: &[usize]) -> Result<()> {
        let n_classes = validate_training_data(x, y)?;
        let mut rng = StdRng::seed_from_u64(self.random_state.unwrap_or(0));
        self.fit_sample(x, y, (0..y.len()).collect(), n_classes, &mut rng);
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or(StressError::NotFitted("DecisionTreeClassifier"))?;
        check_width(self.n_features, x)?;

        let mut data = Vec::with_capacity(x.n_rows() * self.n_classes);
        for sample in x.rows() {
            data.extend_from_slice(&tree.leaf_for(sample).distribution);
        }
        Matrix::from_vec(x.n_rows(), self.n_classes, data)
            .map_err(|_| StressError::dimension_mismatch("classes", self.n_classes, 0))
    }
}

/// Checks shapes and returns the number of classes (`max(y) + 1`).
pub(crate) fn validate_training_data(x: &Matrix<f64>, y: &[usize]) -> Result<usize> {
    let (n_rows, n_cols) = x.shape();
    if n_rows != y.len() {
        return Err(StressError::dimension_mismatch("samples", n_rows, y.len()));
    }
    if n_rows == 0 {
        return Err(StressError::empty_input("training samples"));
    }
    if n_cols == 0 {
        return Err(StressError::empty_input("training features"));
    }
    Ok(y.iter().max().map_or(0, |&m| m + 1))
}

pub(crate) fn check_width(expected: Option<usize>, x: &Matrix<f64>) -> Result<()> {
    match expected {
        Some(n) if n != x.n_cols() => Err(StressError::dimension_mismatch(
            "features",
            n,
            x.n_cols(),
        )),
        _ => Ok(()),
    }
}

struct TreeBuilder<'a> {
    x: &'a Matrix<f64>,
    y: &'a [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: usize,
    importances: Vec<f64>,
    rng: &'a mut StdRng,
}

struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    impurity_decrease: f64,
}

impl TreeBuilder<'_> {
    fn build(&mut self, sample: Vec<usize>, depth: usize) -> TreeNode {
        let counts = class_counts(self.y, &sample, self.n_classes);
        let n_samples = sample.len();
        let gini = gini_from_counts(&counts, n_samples);

        let at_max_depth = self.max_depth.is_some_and(|d| depth >= d);
        if gini <= 0.0 || at_max_depth || n_samples < self.min_samples_split {
            return make_leaf(&counts, n_samples);
        }

        let Some(split) = self.best_split(&sample, &counts, gini) else {
            return make_leaf(&counts, n_samples);
        };

        let (left, right): (Vec<usize>, Vec<usize>) = sample
            .iter()
            .partition(|&&i| self.x.get(i, split.feature_idx) <= split.threshold);
        self.importances[split.feature_idx] += split.impurity_decrease;

        let left = self.build(left, depth + 1);
        let right = self.build(right, depth + 1);
        TreeNode::Node(Node {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// All features in a random order; the first `max_features` are the
    /// regular candidates, the rest are only tried if none of those splits.
    fn candidate_features(&mut self) -> Vec<usize> {
        let mut features: Vec<usize> = (0..self.x.n_cols()).collect();
        if self.max_features < features.len() {
            features.shuffle(&mut *self.rng);
        }
        features
    }

    /// Best split over the candidate features, by weighted impurity decrease.
    ///
    /// Returns `None` if no candidate separates the node.
    fn best_split(
        &mut self,
        sample: &[usize],
        counts: &[usize],
        parent_gini: f64,
    ) -> Option<SplitCandidate> {
        let n = sample.len();
        let mut best: Option<SplitCandidate> = None;

        for (visited, feature_idx) in self.candidate_features().into_iter().enumerate() {
            if visited >= self.max_features && best.is_some() {
                break;
            }
            let mut values: Vec<(f64, usize)> = sample
                .iter()
                .map(|&i| (self.x.get(i, feature_idx), self.y[i]))
                .filter(|(v, _)| !v.is_nan())
                .collect();
            if values.len() < 2 {
                continue;
            }
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = vec![0usize; self.n_classes];
            for pos in 0..values.len() - 1 {
                left[values[pos].1] += 1;
                let (lo, hi) = (values[pos].0, values[pos + 1].0);
                if lo >= hi {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                let right: Vec<usize> = counts.iter().zip(&left).map(|(t, l)| t - l).collect();
                let weighted = (n_left as f64 * gini_from_counts(&left, n_left)
                    + n_right as f64 * gini_from_counts(&right, n_right))
                    / n as f64;
                let decrease = n as f64 * (parent_gini - weighted);

                let improves = best
                    .as_ref()
                    .map_or(true, |b| decrease > b.impurity_decrease);
                if decrease > 1e-12 && improves {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold: if mid < hi { mid } else { lo },
                        impurity_decrease: decrease,
                    });
                }
            }
        }

        best
    }
}

fn make_leaf(counts: &[usize], n_samples: usize) -> TreeNode {
    let distribution = counts
        .iter()
        .map(|&c| c as f64 / n_samples.max(1) as f64)
        .collect();
    TreeNode::Leaf(Leaf {
        distribution,
        n_samples,
    })
}
