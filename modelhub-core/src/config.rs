//! Configuration system for ModelHub.
//!
//! Uses `figment` for layered configuration: defaults → user config file →
//! explicit config file → environment variables → CLI overrides.

use crate::gateway::GatewayConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use modelhub_ml::MlConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "MODELHUB_";

/// Top-level configuration for the model service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub ml: MlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when neither `-v`/`-q` nor `RUST_LOG` is given.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily-rolling JSON log files. Disabled when unset.
    #[serde(default)]
    pub json_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values given on the command line; they take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Location of the per-user config file, e.g. `~/.config/modelhub/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "modelhub", "modelhub")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Build the layered figment without extracting it.
pub fn figment(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(ServiceConfig::default()));

    // User-level config
    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    // Explicit config file
    if let Some(path) = config_file {
        figment = figment.merge(Toml::file_exact(path));
    }

    // Environment variables (MODELHUB_GATEWAY__PORT, MODELHUB_ML__TRAINING__SEED, etc.)
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    // Command-line overrides
    if let Some(host) = &overrides.host {
        figment = figment.merge(Serialized::default("gateway.host", host));
    }
    if let Some(port) = overrides.port {
        figment = figment.merge(Serialized::default("gateway.port", port));
    }

    figment
}

/// Load the service configuration from all layers.
pub fn load_config(
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ServiceConfig, Box<figment::Error>> {
    figment(config_file, overrides).extract().map_err(Box::new)
}
