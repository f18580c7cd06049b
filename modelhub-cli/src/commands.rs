//! Subcommand handlers.

use anyhow::Context;
use modelhub_core::ServiceConfig;
use modelhub_ml::{ModelRegistry, ModelService, Record, TrainRequest};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    tracing::info!(
        addr = %config.gateway.bind_addr(),
        n_estimators = config.ml.training.n_estimators,
        "Starting model service"
    );
    let state = modelhub_core::build_state(&config);
    modelhub_core::run(state)
        .await
        .context("Gateway server failed")
}

pub fn config_init() -> anyhow::Result<()> {
    let config_path = modelhub_core::config::user_config_path()
        .context("Cannot determine the user configuration directory")?;
    if config_path.exists() {
        println!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        return Ok(());
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(&ServiceConfig::default())?;
    std::fs::write(&config_path, &toml_str)?;
    println!(
        "Created default configuration at: {}",
        config_path.display()
    );
    Ok(())
}

pub fn config_show(config: &ServiceConfig) -> anyhow::Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{}", toml_str);
    Ok(())
}

/// Summary of an offline training run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub features: Vec<String>,
    pub samples: usize,
    pub accuracy: f64,
    pub duration_secs: f64,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Features:          {}", self.features.join(", "))?;
        writeln!(f, "Training samples:  {}", self.samples)?;
        writeln!(f, "Training accuracy: {:.3}", self.accuracy)?;
        write!(f, "Duration:          {:.3}s", self.duration_secs)
    }
}

pub fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))
}

/// Train against a throwaway registry to validate a dataset end to end.
pub fn check(
    config: &ServiceConfig,
    data: &Path,
    target: &str,
    features: Vec<String>,
) -> anyhow::Result<CheckReport> {
    let records = load_records(data)?;
    let service = ModelService::new(Arc::new(ModelRegistry::new()), config.ml.clone());
    let outcome = service.train(&TrainRequest {
        data: records,
        target_column: target.to_string(),
        model_name: "check".to_string(),
        features: (!features.is_empty()).then_some(features),
    })?;

    Ok(CheckReport {
        features: outcome.features_used.columns().to_vec(),
        samples: outcome.training_samples,
        accuracy: outcome.accuracy,
        duration_secs: outcome.duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_records(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("records.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    const RECORDS: &str = r#"[
        {"feature1": 1.0, "feature2": 2.0, "target": 0},
        {"feature1": 2.0, "feature2": 3.0, "target": 1},
        {"feature1": 3.0, "feature2": 4.0, "target": 1},
        {"feature1": 0.5, "feature2": 1.0, "target": 0}
    ]"#;

    #[test]
    fn test_check_auto_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_records(dir.path(), RECORDS);
        let report = check(&ServiceConfig::default(), &path, "target", Vec::new()).unwrap();
        assert_eq!(report.features, vec!["feature1", "feature2"]);
        assert_eq!(report.samples, 4);
        assert!(report.to_string().contains("Training samples:  4"));
    }

    #[test]
    fn test_check_explicit_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_records(dir.path(), RECORDS);
        let report = check(
            &ServiceConfig::default(),
            &path,
            "target",
            vec!["feature2".to_string()],
        )
        .unwrap();
        assert_eq!(report.features, vec!["feature2"]);
    }

    #[test]
    fn test_check_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_records(dir.path(), RECORDS);
        let err = check(&ServiceConfig::default(), &path, "label", Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: {label}");
    }

    #[test]
    fn test_load_records_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_records(dir.path(), r#"{"feature1": 1.0}"#);
        assert!(load_records(&path).is_err());
    }
}
