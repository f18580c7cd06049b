//! Model storage and inference.

pub mod model_registry;
pub mod predictor;

pub use model_registry::{ModelEntry, ModelRegistry};
pub use predictor::{Predictor, predict_with_entry};
