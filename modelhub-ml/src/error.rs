//! Error types for the modelhub-ml crate.
//!
//! Every stage of the train/predict pipeline reports failures through [`MlError`].
//! All variants describe caller-input problems; none of them are transient, so
//! nothing in this crate retries.

use std::collections::BTreeSet;
use thiserror::Error;

/// Which side of an inclusive range a value fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Lower,
    Upper,
}

/// Coarse classification used by the request boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Range,
    EmptyFeatureSet,
    Training,
    ModelNotFound,
    InvalidInput,
}

/// Top-level error type for model lifecycle operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MlError {
    #[error("{}", schema_message(.missing, .row))]
    Schema {
        missing: BTreeSet<String>,
        row: Option<usize>,
    },

    #[error("Value {value} {word} {bound}", word = range_word(.kind))]
    Range {
        value: f64,
        bound: f64,
        kind: BoundKind,
    },

    #[error("No numeric features found for training")]
    EmptyFeatureSet,

    #[error("Training error: {0}")]
    Training(String),

    #[error("Model '{name}' not found")]
    ModelNotFound { name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn schema_message(missing: &BTreeSet<String>, row: &Option<usize>) -> String {
    let names: Vec<&str> = missing.iter().map(String::as_str).collect();
    match row {
        Some(row) => format!("Row {row} is missing required columns: {{{}}}", names.join(", ")),
        None => format!("Missing required columns: {{{}}}", names.join(", ")),
    }
}

fn range_word(kind: &BoundKind) -> &'static str {
    match kind {
        BoundKind::Lower => "below minimum",
        BoundKind::Upper => "above maximum",
    }
}

impl MlError {
    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound { name: name.into() }
    }

    /// Batch-level schema failure naming the missing fields.
    pub fn missing_columns<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Schema {
            missing: missing.into_iter().map(Into::into).collect(),
            row: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Range { .. } => ErrorKind::Range,
            Self::EmptyFeatureSet => ErrorKind::EmptyFeatureSet,
            Self::Training(_) => ErrorKind::Training,
            Self::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. })
    }
}

/// Result alias used throughout the crate.
pub type MlResult<T> = Result<T, MlError>;
