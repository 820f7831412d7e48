//! Memoized training state.
//!
//! A [`ModelCache`] holds at most one published [`TrainedModel`]. The lock is
//! held while a model is being produced, so concurrent callers block and then
//! all observe the same `Arc`. A failed computation leaves the cache empty
//! and the next call tries again.
//!
//! ```
//! use stress_risk::cache::ModelCache;
//! use stress_risk::error::StressError;
//!
//! let cache = ModelCache::new();
//! let first = cache.get_or_try_init(|| Err(StressError::empty_input("dataset")));
//! assert!(first.is_err());
//! assert!(!cache.is_populated());
//! ```

use crate::error::Result;
use crate::training::TrainedModel;
use parking_lot::Mutex;
use std::sync::Arc;

/// Process-wide memoization point for the trained model.
#[derive(Debug, Default)]
pub struct ModelCache {
    slot: Mutex<Option<Arc<TrainedModel>>>,
}

impl ModelCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached model, producing it with `init` if the cache is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns whatever `init` returns; nothing is cached in that case.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<TrainedModel>>
    where
        F: FnOnce() -> Result<TrainedModel>,
    {
        let mut slot = self.slot.lock();
        if let Some(model) = slot.as_ref() {
            tracing::debug!("model cache hit");
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(init()?);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Produces a new model with `init` and publishes it, replacing any
    /// cached one. Callers still holding the previous `Arc` keep it.
    ///
    /// # Errors
    ///
    /// Returns whatever `init` returns; the previous model stays cached.
    pub fn replace_with<F>(&self, init: F) -> Result<Arc<TrainedModel>>
    where
        F: FnOnce() -> Result<TrainedModel>,
    {
        let mut slot = self.slot.lock();
        let model = Arc::new(init()?);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// The cached model, if any, without computing.
    #[must_use]
    pub fn current(&self) -> Option<Arc<TrainedModel>> {
        self.slot.lock().clone()
    }

    /// Whether a model has been published.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Drops the cached model.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
