//! `ModelService`: the four model operations plus tabular processing.
//!
//! The service owns no global state. It is handed a registry at construction
//! and every operation is a synchronous, CPU-bound call, so async callers
//! should run it on a blocking thread.

use crate::config::MlConfig;
use crate::data::{ProcessOutcome, ProcessRequest, Record, process};
use crate::error::MlResult;
use crate::features::FeatureSpec;
use crate::inference::{ModelRegistry, Predictor};
use crate::training::{TrainingJob, TrainingPipeline, round_to};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Train request as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRequest {
    pub data: Vec<Record>,
    pub target_column: String,
    pub model_name: String,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub model_name: String,
    /// Training-set accuracy rounded to three decimals.
    pub accuracy: f64,
    pub training_samples: usize,
    pub features_used: FeatureSpec,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub data: Vec<Record>,
    pub model_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictOutcome {
    pub model_name: String,
    pub predictions: Vec<f64>,
    pub input_samples: usize,
    pub duration_secs: f64,
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone)]
pub struct ModelService {
    registry: Arc<ModelRegistry>,
    pipeline: TrainingPipeline,
    predictor: Predictor,
    config: MlConfig,
}

impl ModelService {
    pub fn new(registry: Arc<ModelRegistry>, config: MlConfig) -> Self {
        let pipeline = TrainingPipeline::new(&config);
        let predictor = Predictor::new(Arc::clone(&registry), *pipeline.validator());
        Self {
            registry,
            pipeline,
            predictor,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MlConfig {
        &self.config
    }

    /// Fit a model and publish it under `model_name`.
    ///
    /// The entry is registered only after it is fully built; a failed run
    /// leaves the registry untouched.
    pub fn train(&self, request: &TrainRequest) -> MlResult<TrainOutcome> {
        let start = Instant::now();
        let result = self.pipeline.fit(TrainingJob {
            data: &request.data,
            target_column: &request.target_column,
            model_name: &request.model_name,
            features: request.features.as_deref(),
        });
        let duration_secs = start.elapsed().as_secs_f64();
        log_operation("train", request.data.len(), duration_secs, &result);

        let entry = result?;
        let outcome = TrainOutcome {
            model_name: entry.name.clone(),
            accuracy: round_to(entry.training_accuracy, 3),
            training_samples: entry.training_samples,
            features_used: entry.features.clone(),
            duration_secs,
        };
        self.registry.upsert(entry);
        Ok(outcome)
    }

    /// Score records with a registered model.
    pub fn predict(&self, request: &PredictRequest) -> MlResult<PredictOutcome> {
        let start = Instant::now();
        let result = self.predictor.predict(&request.model_name, &request.data);
        let duration_secs = start.elapsed().as_secs_f64();
        log_operation("predict", request.data.len(), duration_secs, &result);

        Ok(PredictOutcome {
            model_name: request.model_name.clone(),
            predictions: result?,
            input_samples: request.data.len(),
            duration_secs,
        })
    }

    pub fn process(&self, request: &ProcessRequest) -> MlResult<ProcessOutcome> {
        let result = process(request);
        let duration_secs = result.as_ref().map_or(0.0, |o| o.duration_secs);
        log_operation("process", request.data.len(), duration_secs, &result);
        result
    }

    /// Registered model names, sorted.
    pub fn list_models(&self) -> Vec<String> {
        self.registry.list()
    }

    pub fn health(&self) -> Health {
        Health {
            status: "healthy".into(),
            service: "model-service".into(),
        }
    }
}

fn log_operation<T>(operation: &str, records: usize, duration_secs: f64, result: &MlResult<T>) {
    match result {
        Ok(_) => {
            let records_per_sec = if duration_secs > 0.0 {
                records as f64 / duration_secs
            } else {
                0.0
            };
            tracing::info!(
                operation,
                records,
                duration_secs,
                records_per_sec,
                "Operation completed"
            );
        }
        Err(e) => {
            tracing::error!(operation, records, duration_secs, error = %e, "Operation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MlError;
    use pretty_assertions::assert_eq;

    fn service() -> ModelService {
        ModelService::new(Arc::new(ModelRegistry::new()), MlConfig::default())
    }

    fn train_request(name: &str) -> TrainRequest {
        TrainRequest {
            data: vec![
                Record::from_iter([("feature1", 1.0), ("target", 0.0)]),
                Record::from_iter([("feature1", 2.0), ("target", 1.0)]),
            ],
            target_column: "target".into(),
            model_name: name.into(),
            features: None,
        }
    }

    #[test]
    fn test_train_registers_model() {
        let service = service();
        let outcome = service.train(&train_request("m1")).unwrap();
        assert_eq!(outcome.model_name, "m1");
        assert_eq!(outcome.training_samples, 2);
        assert_eq!(outcome.features_used, FeatureSpec::new(["feature1"]));
        assert!(outcome.duration_secs >= 0.0);
        assert_eq!(service.list_models(), vec!["m1"]);
    }

    #[test]
    fn test_failed_train_publishes_nothing() {
        let service = service();
        let mut request = train_request("broken");
        request.target_column = "label".into();
        assert!(matches!(
            service.train(&request),
            Err(MlError::Schema { .. })
        ));
        assert!(service.list_models().is_empty());
    }

    #[test]
    fn test_predict_unknown_model() {
        let err = service()
            .predict(&PredictRequest {
                data: vec![],
                model_name: "ghost".into(),
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_predict_after_train() {
        let service = service();
        service.train(&train_request("m1")).unwrap();
        let outcome = service
            .predict(&PredictRequest {
                data: vec![Record::from_iter([("feature1", 1.5)])],
                model_name: "m1".into(),
            })
            .unwrap();
        assert_eq!(outcome.input_samples, 1);
        assert_eq!(outcome.predictions.len(), 1);
    }

    #[test]
    fn test_health() {
        let health = service().health();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "model-service");
    }
}
