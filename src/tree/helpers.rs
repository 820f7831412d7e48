//! Helper functions for tree building algorithms.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;

/// Gini impurity from class counts: `1 - Σ(p_i²)`.
///
/// Returns 0.0 for an empty node.
pub(super) fn gini_from_counts(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// Class counts over the rows in `sample`.
pub(super) fn class_counts(y: &[usize], sample: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in sample {
        counts[y[i]] += 1;
    }
    counts
}

/// Scales `values` to sum to 1; leaves an all-zero vector untouched.
pub(super) fn normalize_in_place(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}

/// Draws `n_samples` row indices with replacement.
pub(super) fn bootstrap_sample(n_samples: usize, rng: &mut StdRng) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    (0..n_samples).map(|_| dist.sample(rng)).collect()
}
