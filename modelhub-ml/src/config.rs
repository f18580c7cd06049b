//! Configuration types for the modelhub-ml crate.
//!
//! These are the ML-specific sub-configs referenced from the service-level
//! `ServiceConfig` in modelhub-core.

use serde::{Deserialize, Serialize};

/// Top-level ML configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MlConfig {
    /// Forest hyperparameters and sample limits.
    #[serde(default)]
    pub training: TrainingConfig,
    /// Universal feature value bounds.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Fixed hyperparameters for the random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of trees in the ensemble.
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    /// Seed for bootstrap sampling and feature subsampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Maximum tree depth (unbounded if not set).
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Minimum number of samples a node needs before it may split.
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    /// Minimum number of training rows. Empty datasets are always rejected.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            seed: default_seed(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples: default_min_samples(),
        }
    }
}

fn default_n_estimators() -> usize {
    10
}

fn default_seed() -> u64 {
    42
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_samples() -> usize {
    1
}

/// Inclusive bounds applied to every selected feature value at train and
/// predict time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_value")]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_value: default_min_value(),
            max_value: default_max_value(),
        }
    }
}

fn default_min_value() -> f64 {
    -1_000_000.0
}

fn default_max_value() -> f64 {
    1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MlConfig::default();
        assert_eq!(config.training.n_estimators, 10);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.max_depth, None);
        assert_eq!(config.validation.min_value, -1_000_000.0);
        assert_eq!(config.validation.max_value, 1_000_000.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: MlConfig =
            serde_json::from_str(r#"{"training": {"n_estimators": 25}}"#).unwrap();
        assert_eq!(config.training.n_estimators, 25);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.validation, ValidationConfig::default());
    }
}
