//! Persisted model artifacts.
//!
//! A model directory holds two files written by the same training run:
//!
//! ```text
//! <model_dir>/pipeline.bin               bincode, fitted StressPipeline
//! <model_dir>/normalization_stats.json   serde_json, NormalizationStats
//! ```
//!
//! Loading checks that the pair belongs together: the pipeline is fitted, its
//! trees only reference features and classes it has, and the stats cover
//! exactly the pipeline's normalized features.

use crate::error::{Result, StressError};
use crate::pipeline::StressPipeline;
use crate::preprocessing::NormalizationStats;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the serialized pipeline.
pub const PIPELINE_FILE: &str = "pipeline.bin";

/// File name of the normalization stats.
pub const STATS_FILE: &str = "normalization_stats.json";

/// Reads and writes the artifact pair in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `dir`. Nothing is touched until save or load.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the artifacts.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the pipeline artifact.
    #[must_use]
    pub fn pipeline_path(&self) -> PathBuf {
        self.dir.join(PIPELINE_FILE)
    }

    /// Path of the stats artifact.
    #[must_use]
    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    /// Whether both artifact files exist.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.pipeline_path().is_file() && self.stats_path().is_file()
    }

    /// Writes both artifacts, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is unfitted, serialization fails, or
    /// a file cannot be written.
    pub fn save(&self, pipeline: &StressPipeline, stats: &NormalizationStats) -> Result<()> {
        if !pipeline.is_fitted() {
            return Err(StressError::NotFitted("StressPipeline"));
        }
        fs::create_dir_all(&self.dir)?;

        let bytes = bincode::serialize(pipeline)?;
        fs::write(self.pipeline_path(), bytes)?;
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(self.stats_path(), json)?;

        tracing::info!(dir = %self.dir.display(), "model artifacts saved");
        Ok(())
    }

    /// Loads the artifact pair.
    ///
    /// Returns `Ok(None)` when either file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or decoded, or the pair is
    /// structurally inconsistent.
    ///
    /// # Examples
    ///
    /// ```
    /// use stress_risk::serialization::ArtifactStore;
    ///
    /// let dir = tempfile::tempdir().expect("temp dir");
    /// let store = ArtifactStore::new(dir.path());
    /// assert!(store.load().expect("nothing to decode").is_none());
    /// ```
    pub fn load(&self) -> Result<Option<(StressPipeline, NormalizationStats)>> {
        if !self.exists() {
            return Ok(None);
        }

        let bytes = fs::read(self.pipeline_path())?;
        let pipeline: StressPipeline = bincode::deserialize(&bytes)?;
        let json = fs::read_to_string(self.stats_path())?;
        let stats: NormalizationStats = serde_json::from_str(&json)?;

        check_pair(&pipeline, &stats)?;
        tracing::debug!(dir = %self.dir.display(), "model artifacts loaded");
        Ok(Some((pipeline, stats)))
    }
}

/// Checks that `stats` and `pipeline` come from the same training run.
///
/// # Errors
///
/// Returns an error if the pipeline is unfitted or internally inconsistent,
/// the stats cannot normalize, or the normalized feature sets differ.
pub fn check_pair(pipeline: &StressPipeline, stats: &NormalizationStats) -> Result<()> {
    StressPipeline::from_parts(
        pipeline.transformer().clone(),
        pipeline.forest().clone(),
        pipeline.classes().to_vec(),
    )
    .map_err(|e| StressError::Serialization(format!("inconsistent pipeline: {e}")))?;
    stats.validate()?;

    let mut expected: Vec<_> = pipeline
        .numeric_features()
        .iter()
        .copied()
        .filter(|f| f.is_normalized())
        .collect();
    expected.sort();
    let mut actual = stats.features();
    actual.sort();

    if expected != actual {
        return Err(StressError::Serialization(format!(
            "normalization stats cover {actual:?}, pipeline expects {expected:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NumericFeature;
    use crate::pipeline::TrainingConfig;
    use crate::preprocessing::FeatureStats;
    use crate::test_support::{retarget_first_split, survey};
    use crate::training::{train, TrainedModel};

    fn model() -> TrainedModel {
        let config = TrainingConfig::default().with_n_estimators(10);
        train(&survey(40), &config).expect("training should succeed")
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path().join("absent"));
        assert!(!store.exists());
        assert!(store.load().expect("no error").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path().join("models"));
        let model = model();

        store.save(&model.pipeline, &model.stats).expect("save");
        assert!(store.pipeline_path().ends_with(PIPELINE_FILE));
        assert!(store.exists());

        let (pipeline, stats) = store.load().expect("load").expect("present");
        assert_eq!(pipeline, model.pipeline);
        assert_eq!(stats, model.stats);
    }

    #[test]
    fn test_stats_file_is_keyed_by_header() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        let model = model();
        store.save(&model.pipeline, &model.stats).expect("save");

        let json = fs::read_to_string(store.stats_path()).expect("read");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert!(value.get("IPK").is_some());
        assert!(value.get("Umur").is_none());
    }

    #[test]
    fn test_unfitted_pipeline_not_saved() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        let pipeline = StressPipeline::new(&TrainingConfig::default());
        let stats = model().stats;
        assert!(matches!(
            store.save(&pipeline, &stats).unwrap_err(),
            StressError::NotFitted(_)
        ));
        assert!(!store.exists());
    }

    #[test]
    fn test_corrupt_pipeline_is_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        let model = model();
        store.save(&model.pipeline, &model.stats).expect("save");

        fs::write(store.pipeline_path(), b"not a pipeline").expect("overwrite");
        assert!(matches!(
            store.load().unwrap_err(),
            StressError::Serialization(_)
        ));
    }

    #[test]
    fn test_mismatched_stats_is_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        let model = model();

        let partial = NormalizationStats::from_stats([(
            NumericFeature::Gpa,
            FeatureStats { mean: 3.0, std: 0.5 },
        )]);
        store.save(&model.pipeline, &partial).expect("save");
        assert!(store.load().is_err());
    }

    #[test]
    fn test_split_outside_width_is_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(dir.path());
        let model = model();
        let broken = retarget_first_split(&model.pipeline, 10_000);

        assert!(matches!(
            check_pair(&broken, &model.stats).unwrap_err(),
            StressError::Serialization(ref msg) if msg.contains("split feature")
        ));

        store.save(&broken, &model.stats).expect("save");
        assert!(matches!(
            store.load().unwrap_err(),
            StressError::Serialization(_)
        ));
    }
}
