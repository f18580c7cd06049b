//! End-to-end fitting of a [`ModelEntry`] from raw records.

use super::trainer::{Trainer, extract_labels};
use crate::config::MlConfig;
use crate::data::{RangeValidator, Record, sanitize_dataset, validate_required_fields};
use crate::error::MlResult;
use crate::features::{StandardScaler, build_matrix, select_features};
use crate::inference::ModelEntry;
use chrono::Utc;

/// Inputs of one training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainingJob<'a> {
    pub data: &'a [Record],
    pub target_column: &'a str,
    pub model_name: &'a str,
    pub features: Option<&'a [String]>,
}

/// Runs sanitize, schema check, feature selection, range-checked matrix
/// extraction, scaling and forest fitting in that order.
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    trainer: Trainer,
    validator: RangeValidator,
}

impl TrainingPipeline {
    pub fn new(config: &MlConfig) -> Self {
        Self {
            trainer: Trainer::new(config.training.clone()),
            validator: RangeValidator::from(&config.validation),
        }
    }

    pub fn validator(&self) -> &RangeValidator {
        &self.validator
    }

    /// Build a complete entry. Nothing is published; the caller decides
    /// whether to register it.
    pub fn fit(&self, job: TrainingJob<'_>) -> MlResult<ModelEntry> {
        let sanitized = sanitize_dataset(job.data);

        let mut required = vec![job.target_column];
        if let Some(features) = job.features {
            required.extend(features.iter().map(String::as_str));
        }
        validate_required_fields(&sanitized, &required)?;

        let features = select_features(&sanitized, Some(job.target_column), job.features)?;
        let matrix = build_matrix(&sanitized, &features, &self.validator)?;
        let labels = extract_labels(&sanitized, job.target_column)?;

        let scaler = StandardScaler::fit(&matrix)?;
        let scaled = scaler.transform(&matrix)?;
        let trained = self.trainer.fit(&scaled, &labels)?;

        Ok(ModelEntry {
            name: job.model_name.to_string(),
            classifier: trained.model,
            features,
            scaler,
            training_accuracy: trained.training_accuracy,
            training_samples: sanitized.len(),
            trained_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use crate::error::MlError;
    use pretty_assertions::assert_eq;

    fn records() -> Vec<Record> {
        vec![
            Record::from_iter([("Feature1", 1.0), ("feature2", 2.0), ("target", 0.0)]),
            Record::from_iter([("Feature1", 2.0), ("feature2", 3.0), ("target", 1.0)]),
            Record::from_iter([("Feature1", 3.0), ("feature2", 4.0), ("target", 1.0)]),
            Record::from_iter([("Feature1", 0.5), ("feature2", 1.0), ("target", 0.0)]),
        ]
    }

    fn job<'a>(data: &'a [Record], features: Option<&'a [String]>) -> TrainingJob<'a> {
        TrainingJob {
            data,
            target_column: "target",
            model_name: "m1",
            features,
        }
    }

    #[test]
    fn test_fit_auto_selects_numeric_features() {
        let data = records();
        let entry = TrainingPipeline::default().fit(job(&data, None)).unwrap();
        assert_eq!(entry.name, "m1");
        assert_eq!(entry.features.columns(), ["feature1", "feature2"]);
        assert_eq!(entry.training_samples, 4);
        assert_eq!(entry.scaler.n_features(), 2);
    }

    #[test]
    fn test_fit_with_explicit_features() {
        let data = records();
        let explicit = vec!["feature2".to_string()];
        let entry = TrainingPipeline::default()
            .fit(job(&data, Some(explicit.as_slice())))
            .unwrap();
        assert_eq!(entry.features.columns(), ["feature2"]);
    }

    #[test]
    fn test_missing_target_is_schema_error() {
        let data = vec![Record::from_iter([("feature1", 1.0)])];
        let err = TrainingPipeline::default().fit(job(&data, None)).unwrap_err();
        assert_eq!(err, MlError::missing_columns(["target"]));
    }

    #[test]
    fn test_missing_explicit_feature_is_schema_error() {
        let data = records();
        let explicit = vec!["feature3".to_string()];
        let err = TrainingPipeline::default()
            .fit(job(&data, Some(explicit.as_slice())))
            .unwrap_err();
        assert_eq!(err, MlError::missing_columns(["feature3"]));
    }

    #[test]
    fn test_text_only_features_are_empty_feature_set() {
        let data = vec![
            [("name", Value::from("a")), ("target", Value::from(0.0))]
                .into_iter()
                .collect::<Record>(),
        ];
        let err = TrainingPipeline::default().fit(job(&data, None)).unwrap_err();
        assert_eq!(err, MlError::EmptyFeatureSet);
    }

    #[test]
    fn test_out_of_range_feature_is_range_error() {
        let mut data = records();
        data[2].insert("feature2", 2_000_000.0);
        assert!(matches!(
            TrainingPipeline::default().fit(job(&data, None)),
            Err(MlError::Range { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(TrainingPipeline::default().fit(job(&[], None)).is_err());
    }

    #[test]
    fn test_fit_is_reproducible() {
        let data = records();
        let pipeline = TrainingPipeline::default();
        let a = pipeline.fit(job(&data, None)).unwrap();
        let b = pipeline.fit(job(&data, None)).unwrap();
        assert_eq!(a.training_accuracy, b.training_accuracy);
        assert_eq!(a.scaler, b.scaler);
    }
}
