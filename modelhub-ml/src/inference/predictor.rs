//! Scoring new records against a registered model.

use super::model_registry::{ModelEntry, ModelRegistry};
use crate::data::{RangeValidator, Record, sanitize_dataset, validate_required_fields};
use crate::error::MlResult;
use crate::features::build_matrix;
use std::sync::Arc;

/// Reapplies a model's feature preparation to new records and runs inference.
#[derive(Debug, Clone)]
pub struct Predictor {
    registry: Arc<ModelRegistry>,
    validator: RangeValidator,
}

impl Predictor {
    pub fn new(registry: Arc<ModelRegistry>, validator: RangeValidator) -> Self {
        Self {
            registry,
            validator,
        }
    }

    /// Predict one label per record, in input order.
    pub fn predict(&self, model_name: &str, data: &[Record]) -> MlResult<Vec<f64>> {
        let entry = self.registry.lookup(model_name)?;
        predict_with_entry(&entry, data, &self.validator)
    }
}

/// Sanitize, validate, standardize with the stored scaler, then classify.
///
/// Pure function of the entry and the input records.
pub fn predict_with_entry(
    entry: &ModelEntry,
    data: &[Record],
    validator: &RangeValidator,
) -> MlResult<Vec<f64>> {
    let sanitized = sanitize_dataset(data);
    validate_required_fields(&sanitized, entry.features.columns())?;
    let matrix = build_matrix(&sanitized, &entry.features, validator)?;
    let scaled = entry.scaler.transform(&matrix)?;
    entry.classifier.predict(&scaled)
}
