//! Classifier fitting with a training-set accuracy diagnostic.

use super::metrics::accuracy;
use crate::algorithms::RandomForest;
use crate::config::TrainingConfig;
use crate::data::{Record, Value};
use crate::error::{MlError, MlResult};
use crate::features::FeatureMatrix;

/// A fitted classifier plus its accuracy on the rows it was trained on.
///
/// `training_accuracy` is a diagnostic, not a held-out estimate.
#[derive(Debug, Clone)]
pub struct TrainedClassifier {
    pub model: RandomForest,
    pub training_accuracy: f64,
}

/// Fits a random forest with fixed hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit on standardized features and their labels.
    pub fn fit(&self, x: &FeatureMatrix, labels: &[f64]) -> MlResult<TrainedClassifier> {
        let required = self.config.min_samples.max(1);
        if x.len() < required {
            return Err(MlError::training(format!(
                "Need at least {required} training samples, got {}",
                x.len()
            )));
        }

        let model = RandomForest::fit(x, labels, &self.config)?;
        let predicted = model.predict(x)?;
        let training_accuracy = accuracy(&predicted, labels);

        tracing::debug!(
            trees = model.n_trees(),
            classes = model.classes().len(),
            training_accuracy,
            "Fitted random forest"
        );

        Ok(TrainedClassifier {
            model,
            training_accuracy,
        })
    }
}

/// Read the label of every record from `target`.
pub fn extract_labels(data: &[Record], target: &str) -> MlResult<Vec<f64>> {
    data.iter()
        .enumerate()
        .map(|(row, record)| match record.get(target) {
            Some(value) => value.as_label().ok_or_else(|| {
                MlError::training(format!(
                    "Row {row}: target '{target}' is {}, expected number or boolean",
                    label_kind(value)
                ))
            }),
            None => Err(MlError::training(format!(
                "Row {row}: target '{target}' is missing"
            ))),
        })
        .collect()
}

fn label_kind(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "a non-finite number",
        other => other.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_reports_accuracy() {
        let x = vec![vec![-1.0], vec![-0.5], vec![0.5], vec![1.0]];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let trained = Trainer::default().fit(&x, &y).unwrap();
        assert!(trained.training_accuracy > 0.0 && trained.training_accuracy <= 1.0);
    }

    #[test]
    fn test_min_samples_enforced() {
        let trainer = Trainer::new(TrainingConfig {
            min_samples: 5,
            ..TrainingConfig::default()
        });
        let err = trainer.fit(&vec![vec![1.0]; 4], &[0.0; 4]).unwrap_err();
        assert_eq!(
            err,
            MlError::training("Need at least 5 training samples, got 4")
        );
    }

    #[test]
    fn test_empty_rejected_even_with_zero_minimum() {
        let trainer = Trainer::new(TrainingConfig {
            min_samples: 0,
            ..TrainingConfig::default()
        });
        assert!(trainer.fit(&Vec::new(), &[]).is_err());
    }

    #[test]
    fn test_extract_labels() {
        let data = vec![
            Record::from_iter([("target", Value::Number(1.0))]),
            Record::from_iter([("target", Value::Bool(false))]),
        ];
        assert_eq!(extract_labels(&data, "target").unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_extract_labels_rejects_text_and_missing() {
        let text = vec![Record::from_iter([("target", "yes")])];
        assert!(matches!(
            extract_labels(&text, "target"),
            Err(MlError::Training(_))
        ));
        let missing = vec![Record::from_iter([("other", 1.0)])];
        assert_eq!(
            extract_labels(&missing, "target").unwrap_err(),
            MlError::training("Row 0: target 'target' is missing")
        );
    }
}
