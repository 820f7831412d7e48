//! Core traits for classifiers and transformers.
//!
//! These traits define the API contracts the pipeline composes.

use crate::data::FeatureTable;
use crate::error::{Result, StressError};
use crate::primitives::Matrix;

/// Supervised classifier over dense `f64` features and class indices.
///
/// Implementors provide `fit` and `predict_proba`; `predict` and `score`
/// derive from the probabilities.
///
/// # Examples
///
/// ```
/// use stress_risk::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 8.0, 9.0]).expect("valid matrix");
/// let y = vec![0, 0, 1, 1];
///
/// let mut tree = DecisionTreeClassifier::new().with_max_depth(2);
/// tree.fit(&x, &y).expect("fit should succeed");
/// assert_eq!(tree.predict(&x).expect("fitted"), y);
/// assert!((tree.score(&x, &y).expect("fitted") - 1.0).abs() < 1e-12);
/// ```
pub trait Classifier {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, empty data, etc.).
    fn fit(&mut self, x: &Matrix<f64>, y: &[usize]) -> Result<()>;

    /// Class probabilities, one row per sample and one column per class index.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the width is wrong.
    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Most probable class per sample; ties go to the lowest class index.
    ///
    /// # Errors
    ///
    /// Same as [`Classifier::predict_proba`].
    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().map(argmax).collect())
    }

    /// Accuracy on labelled data.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails or `y` has the wrong length.
    fn score(&self, x: &Matrix<f64>, y: &[usize]) -> Result<f64> {
        let predictions = self.predict(x)?;
        if predictions.len() != y.len() {
            return Err(StressError::dimension_mismatch(
                "labels",
                predictions.len(),
                y.len(),
            ));
        }
        Ok(crate::metrics::accuracy(&predictions, y))
    }
}

/// Trait for table-to-matrix transformers (encoders, column transformers).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, table: &FeatureTable) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted or a column is missing.
    fn transform(&self, table: &FeatureTable) -> Result<Matrix<f64>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, table: &FeatureTable) -> Result<Matrix<f64>> {
        self.fit(table)?;
        self.transform(table)
    }
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed-probability classifier to test trait default methods
    struct ConstantClassifier {
        proba: Vec<f64>,
    }

    impl Classifier for ConstantClassifier {
        fn fit(&mut self, _x: &Matrix<f64>, _y: &[usize]) -> Result<()> {
            Ok(())
        }

        fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
            let data = x
                .rows()
                .flat_map(|_| self.proba.iter().copied())
                .collect();
            Ok(Matrix::from_vec(x.n_rows(), self.proba.len(), data).expect("valid shape"))
        }
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.2, 0.3, 0.3]), 1);
        assert_eq!(argmax(&[0.9]), 0);
    }

    #[test]
    fn test_predict_default_uses_argmax() {
        let clf = ConstantClassifier {
            proba: vec![0.25, 0.75],
        };
        let x = Matrix::zeros(3, 1);
        assert_eq!(clf.predict(&x).expect("predict"), vec![1, 1, 1]);
    }

    #[test]
    fn test_score_default() {
        let clf = ConstantClassifier {
            proba: vec![0.6, 0.4],
        };
        let x = Matrix::zeros(4, 1);
        let score = clf.score(&x, &[0, 0, 1, 0]).expect("score");
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_score_length_mismatch() {
        let clf = ConstantClassifier { proba: vec![1.0] };
        let x = Matrix::zeros(2, 1);
        assert!(clf.score(&x, &[0]).is_err());
    }
}
