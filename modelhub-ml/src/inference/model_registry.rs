//! In-process model registry keyed by model name.

use crate::algorithms::RandomForest;
use crate::error::{MlError, MlResult};
use crate::features::{FeatureSpec, StandardScaler};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything needed to score new records for one trained model.
///
/// Entries are immutable once built; retraining publishes a new entry.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub name: String,
    pub classifier: RandomForest,
    pub features: FeatureSpec,
    pub scaler: StandardScaler,
    pub training_accuracy: f64,
    pub training_samples: usize,
    pub trained_at: DateTime<Utc>,
}

type ModelMap = HashMap<String, Arc<ModelEntry>>;

/// Copy-on-write map from model name to [`ModelEntry`].
///
/// Lookups and listings load the current snapshot without locking. Upserts
/// publish a new snapshot through a compare-and-swap loop, so concurrent
/// upserts serialize (last writer wins) and a reader sees either the old or
/// the new complete entry.
pub struct ModelRegistry {
    models: ArcSwap<ModelMap>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Insert or replace the entry stored under `entry.name`.
    ///
    /// Returns the entry that was replaced, if any.
    pub fn upsert(&self, entry: ModelEntry) -> Option<Arc<ModelEntry>> {
        let name = entry.name.clone();
        let entry = Arc::new(entry);
        let previous = self.models.rcu(|current| {
            let mut next = ModelMap::clone(current);
            next.insert(name.clone(), Arc::clone(&entry));
            next
        });
        previous.get(&name).cloned()
    }

    pub fn lookup(&self, name: &str) -> MlResult<Arc<ModelEntry>> {
        self.models
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| MlError::model_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.load().contains_key(name)
    }

    /// Registered model names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.load().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.models.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.load().is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.list())
            .finish()
    }
}
