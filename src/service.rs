//! Request-level entry points.
//!
//! [`StressService`] owns the configuration, the artifact store and the
//! model cache. The first request that needs a model either loads the
//! persisted artifacts or trains from the dataset; every later request
//! reuses the cached result.

use crate::advice::{advise, Advice};
use crate::cache::ModelCache;
use crate::config::AppConfig;
use crate::data::{describe, ColumnStats, DatasetSummary, FeatureTable, RawTable};
use crate::error::Result;
use crate::inference::{predict_batch, Prediction, StudentProfile};
use crate::pipeline::FeatureImportance;
use crate::preprocessing::clean_table_with;
use crate::serialization::ArtifactStore;
use crate::training::{evaluate_held_out, train, EvaluationSnapshot, TrainedModel};
use serde::Serialize;
use std::sync::Arc;

/// Number of features listed in a performance report.
pub const REPORT_TOP_FEATURES: usize = 10;

/// Prediction and recommendations for one submitted profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// Display name from the profile
    pub name: String,
    /// Model output
    pub prediction: Prediction,
    /// Recommendations for this profile
    pub advice: Vec<Advice>,
}

/// Model performance as shown to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Held-out evaluation
    pub evaluation: EvaluationSnapshot,
    /// Most important transformed features, descending
    pub top_features: Vec<FeatureImportance>,
}

/// Stress-risk service.
#[derive(Debug)]
pub struct StressService {
    config: AppConfig,
    store: ArtifactStore,
    cache: ModelCache,
}

impl StressService {
    /// Service over `config`. No I/O happens until the first request.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let store = ArtifactStore::new(config.model_dir.clone());
        Self {
            config,
            store,
            cache: ModelCache::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Artifact store used for loading and saving.
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Reads and cleans the configured dataset.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StressError::DatasetNotFound`] or
    /// [`crate::error::StressError::MissingColumn`] for unusable input.
    pub fn load_dataset(&self) -> Result<FeatureTable> {
        let raw = RawTable::from_path(&self.config.dataset_path)?;
        clean_table_with(&raw, self.config.training.gpa_repair())
    }

    /// The trained model, loading or training it on first use.
    ///
    /// Valid artifacts are loaded and re-evaluated on the held-out split.
    /// Missing or unusable artifacts fall back to training from the
    /// dataset, and the fresh model is written back to the store.
    ///
    /// # Errors
    ///
    /// Returns dataset and training errors. Nothing is cached on error.
    pub fn model(&self) -> Result<Arc<TrainedModel>> {
        self.cache.get_or_try_init(|| self.load_or_train())
    }

    /// Trains a new model, saves it and replaces the cached one.
    ///
    /// # Errors
    ///
    /// Returns dataset, training or artifact write errors. The previously
    /// cached model stays in place on error.
    pub fn retrain(&self) -> Result<Arc<TrainedModel>> {
        self.cache.replace_with(|| {
            let table = self.load_dataset()?;
            let model = train(&table, &self.config.training)?;
            self.store.save(&model.pipeline, &model.stats)?;
            Ok(model)
        })
    }

    /// Predicts 1 to 5 profiles and attaches recommendations.
    ///
    /// # Errors
    ///
    /// Returns model errors, an invalid batch size, or the first invalid
    /// profile.
    pub fn predict_batch(&self, profiles: &[StudentProfile]) -> Result<Vec<Assessment>> {
        let model = self.model()?;
        let predictions = predict_batch(&model, profiles)?;
        Ok(profiles
            .iter()
            .zip(predictions)
            .map(|(profile, prediction)| Assessment {
                name: profile.name.clone(),
                advice: advise(profile, &prediction),
                prediction,
            })
            .collect())
    }

    /// Evaluation and top features of the current model.
    ///
    /// # Errors
    ///
    /// Returns model errors.
    pub fn report(&self) -> Result<PerformanceReport> {
        let model = self.model()?;
        Ok(PerformanceReport {
            evaluation: model.evaluation.clone(),
            top_features: model.pipeline.top_features(REPORT_TOP_FEATURES),
        })
    }

    /// Row and category counts of the dataset.
    ///
    /// # Errors
    ///
    /// Returns dataset errors.
    pub fn summary(&self) -> Result<DatasetSummary> {
        Ok(DatasetSummary::from_table(&self.load_dataset()?))
    }

    /// Numeric column statistics, optionally for one label only.
    ///
    /// # Errors
    ///
    /// Returns dataset errors.
    pub fn describe(&self, label: Option<&str>) -> Result<Vec<ColumnStats>> {
        Ok(describe(&self.load_dataset()?, label))
    }

    fn load_or_train(&self) -> Result<TrainedModel> {
        let table = self.load_dataset()?;

        match self.store.load() {
            Ok(Some((pipeline, stats))) => {
                match evaluate_held_out(&pipeline, &stats, &table, &self.config.training) {
                    Ok(evaluation) => {
                        tracing::info!(
                            dir = %self.store.dir().display(),
                            accuracy = evaluation.accuracy,
                            "using persisted model"
                        );
                        return Ok(TrainedModel {
                            pipeline,
                            stats,
                            evaluation,
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "persisted model unusable, retraining"),
                }
            }
            Ok(None) => tracing::info!(dir = %self.store.dir().display(), "no persisted model"),
            Err(e) => tracing::warn!(error = %e, "persisted model unreadable, retraining"),
        }

        let model = train(&table, &self.config.training)?;
        if let Err(e) = self.store.save(&model.pipeline, &model.stats) {
            tracing::warn!(error = %e, "could not persist trained model");
        }
        Ok(model)
    }
}
