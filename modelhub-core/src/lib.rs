//! # modelhub-core
//!
//! Service layer for ModelHub: layered configuration and the JSON gateway
//! that fronts the model lifecycle core in `modelhub-ml`.

pub mod config;
pub mod error;
pub mod gateway;

pub use config::{ConfigOverrides, LoggingConfig, ServiceConfig, load_config};
pub use error::GatewayError;
pub use gateway::{AppState, GatewayConfig, SharedState, router, run};

use modelhub_ml::{ModelRegistry, ModelService};
use std::sync::Arc;

/// Wire a fresh, empty registry and service into gateway state.
pub fn build_state(config: &ServiceConfig) -> SharedState {
    let registry = Arc::new(ModelRegistry::new());
    let service = ModelService::new(registry, config.ml.clone());
    AppState::shared(service, config.gateway.clone())
}
