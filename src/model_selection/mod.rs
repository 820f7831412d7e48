//! Train/test splitting.

use crate::error::{Result, StressError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    /// Rows used for fitting
    pub train: Vec<usize>,
    /// Rows held out for evaluation
    pub test: Vec<usize>,
}

/// Validates inputs and returns `(n_train, n_test)`.
///
/// The test set gets `ceil(n_samples * test_size)` rows.
fn split_sizes(n_samples: usize, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(StressError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: "0 < test_size < 1".to_string(),
        });
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(StressError::EmptyInput {
            context: format!(
                "split of {n_samples} rows would leave an empty set (n_train={n_train}, n_test={n_test})"
            ),
        });
    }
    Ok((n_train, n_test))
}

/// Shuffles indices with optional random seed.
fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }

    indices
}

/// Randomly partitions `0..n_samples` into train and test rows.
///
/// With a fixed `random_state` the partition is reproducible.
///
/// # Errors
///
/// Returns an error if `test_size` is not in (0, 1) or either side would be
/// empty.
///
/// # Examples
///
/// ```
/// use stress_risk::model_selection::train_test_split;
///
/// let split = train_test_split(10, 0.2, Some(42)).expect("valid split");
/// assert_eq!(split.train.len(), 8);
/// assert_eq!(split.test.len(), 2);
/// ```
pub fn train_test_split(
    n_samples: usize,
    test_size: f64,
    random_state: Option<u64>,
) -> Result<TrainTestSplit> {
    let (n_train, _) = split_sizes(n_samples, test_size)?;
    let mut indices = shuffle_indices(n_samples, random_state);
    let test = indices.split_off(n_train);
    Ok(TrainTestSplit {
        train: indices,
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes_use_ceiling() {
        let split = train_test_split(11, 0.2, Some(42)).expect("Split should succeed");
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_split_is_partition() {
        let split = train_test_split(50, 0.2, Some(7)).expect("Split should succeed");
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_reproducibility() {
        let a = train_test_split(30, 0.2, Some(42)).expect("Split should succeed");
        let b = train_test_split(30, 0.2, Some(42)).expect("Split should succeed");
        assert_eq!(a, b);
        let c = train_test_split(30, 0.2, Some(43)).expect("Split should succeed");
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_invalid_test_size() {
        for bad in [0.0, 1.0, -0.5, f64::NAN] {
            let err = train_test_split(10, bad, Some(1)).unwrap_err();
            assert!(matches!(err, StressError::InvalidHyperparameter { .. }));
        }
    }

    #[test]
    fn test_split_too_few_rows() {
        let err = train_test_split(1, 0.2, Some(1)).unwrap_err();
        assert!(matches!(err, StressError::EmptyInput { .. }));
        assert!(train_test_split(0, 0.2, Some(1)).is_err());
    }
}
