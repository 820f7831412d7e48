//! Application configuration
//!
//! | Variable              | Default                |
//! |-----------------------|------------------------|
//! | `STRESS_DATASET`      | `data/raw/dataset.csv` |
//! | `STRESS_MODEL_DIR`    | `models`               |
//! | `STRESS_SEED`         | `42`                   |
//! | `STRESS_TEST_SIZE`    | `0.2`                  |
//! | `STRESS_N_ESTIMATORS` | `200`                  |
//! | `STRESS_MAX_DEPTH`    | `4`                    |

use crate::error::{Result, StressError};
use crate::pipeline::TrainingConfig;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default location of the survey file.
pub const DEFAULT_DATASET: &str = "data/raw/dataset.csv";

/// Default artifact directory.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Semicolon-delimited survey file
    pub dataset_path: PathBuf,

    /// Directory holding `pipeline.bin` and `normalization_stats.json`
    pub model_dir: PathBuf,

    /// Split and forest settings
    pub training: TrainingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            training: TrainingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`StressError::InvalidHyperparameter`] if a variable is set
    /// but cannot be parsed or is out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stress_risk::config::AppConfig;
    ///
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "STRESS_SEED" => Some("7".to_string()),
    ///     _ => None,
    /// })
    /// .expect("valid config");
    /// assert_eq!(config.training.random_state(), 7);
    /// assert_eq!(config.training.n_estimators(), 200);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TrainingConfig::default();
        let training = TrainingConfig::default()
            .with_random_state(parse_or(&lookup, "STRESS_SEED", defaults.random_state())?)
            .with_test_size(parse_or(&lookup, "STRESS_TEST_SIZE", defaults.test_size())?)
            .with_n_estimators(parse_or(
                &lookup,
                "STRESS_N_ESTIMATORS",
                defaults.n_estimators(),
            )?)
            .with_max_depth(parse_or(&lookup, "STRESS_MAX_DEPTH", defaults.max_depth())?);
        training.validate()?;

        Ok(Self {
            dataset_path: lookup("STRESS_DATASET")
                .map_or_else(|| PathBuf::from(DEFAULT_DATASET), PathBuf::from),
            model_dir: lookup("STRESS_MODEL_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR), PathBuf::from),
            training,
        })
    }

    /// Replace the dataset path.
    #[must_use]
    pub fn with_dataset_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Replace the artifact directory.
    #[must_use]
    pub fn with_model_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Replace the training settings.
    #[must_use]
    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StressError::InvalidHyperparameter {
                param: key.to_string(),
                value: raw.clone(),
                constraint: format!("a valid {}", std::any::type_name::<T>()),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.dataset_path, PathBuf::from("data/raw/dataset.csv"));
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.training.random_state(), 42);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STRESS_DATASET", "/tmp/survey.csv"),
            ("STRESS_MODEL_DIR", "/tmp/models"),
            ("STRESS_SEED", "7"),
            ("STRESS_TEST_SIZE", "0.3"),
            ("STRESS_N_ESTIMATORS", " 50 "),
            ("STRESS_MAX_DEPTH", "6"),
        ]))
        .expect("valid");
        assert_eq!(config.dataset_path, PathBuf::from("/tmp/survey.csv"));
        assert_eq!(config.model_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.training.random_state(), 7);
        assert!((config.training.test_size() - 0.3).abs() < 1e-12);
        assert_eq!(config.training.n_estimators(), 50);
        assert_eq!(config.training.max_depth(), 6);
    }

    #[test]
    fn test_unparseable_value() {
        let err = AppConfig::from_lookup(lookup(&[("STRESS_SEED", "abc")])).unwrap_err();
        assert!(
            matches!(err, StressError::InvalidHyperparameter { ref param, .. } if param == "STRESS_SEED")
        );
    }

    #[test]
    fn test_out_of_range_value() {
        let err = AppConfig::from_lookup(lookup(&[("STRESS_TEST_SIZE", "1.5")])).unwrap_err();
        assert!(matches!(err, StressError::InvalidHyperparameter { .. }));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_dataset_path("a.csv")
            .with_model_dir("out")
            .with_training(TrainingConfig::default().with_n_estimators(5));
        assert_eq!(config.dataset_path, PathBuf::from("a.csv"));
        assert_eq!(config.model_dir, PathBuf::from("out"));
        assert_eq!(config.training.n_estimators(), 5);
    }
}
