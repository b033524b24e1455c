//! Error taxonomy for the evaluation pipeline.
//!
//! Every variant is fatal: failures are caused by the inputs, never
//! transient, so nothing in the pipeline retries.

use std::path::PathBuf;

use crate::dataset::Label;

/// Errors raised by the evaluation pipeline stages
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Failed to load dataset '{}': {reason}", .path.display())]
    DataLoad { path: PathBuf, reason: String },

    #[error("Failed to load model '{}': {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Insufficient data: requested {requested} {class} records but only {available} available")]
    InsufficientData {
        class: Label,
        requested: usize,
        available: usize,
    },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Prediction length mismatch: {what} has {actual} entries but the matrix has {expected} rows")]
    PredictionLengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl EvalError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EvalError::DataLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EvalError::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
