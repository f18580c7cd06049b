//! # modelhub-ml: model lifecycle core
//!
//! Turns raw record batches into a validated, standardized, trained
//! classifier, stores it by name, and replays the same feature preparation
//! to score new records.
//!
//! Training runs sanitize → schema check → feature selection → range check →
//! scaler fit → forest fit → registry upsert. Prediction runs registry lookup →
//! sanitize → schema check against the stored features → range check →
//! stored scaler transform → forest predict.

// Foundation
pub mod config;
pub mod error;

// Data and features
pub mod data;
pub mod features;

// Models
pub mod algorithms;
pub mod inference;
pub mod training;

// Facade
pub mod service;

// Re-exports
pub use config::{MlConfig, TrainingConfig, ValidationConfig};
pub use data::{Dataset, ProcessOutcome, ProcessRequest, Record, Value};
pub use error::{MlError, MlResult};
pub use features::FeatureSpec;
pub use inference::{ModelEntry, ModelRegistry, Predictor};
pub use service::{Health, ModelService, PredictOutcome, PredictRequest, TrainOutcome, TrainRequest};
