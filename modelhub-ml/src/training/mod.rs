//! Training: labels, classifier fitting and the end-to-end pipeline.

pub mod metrics;
pub mod pipeline;
pub mod trainer;

pub use metrics::{accuracy, round_to};
pub use pipeline::{TrainingJob, TrainingPipeline};
pub use trainer::{TrainedClassifier, Trainer, extract_labels};
