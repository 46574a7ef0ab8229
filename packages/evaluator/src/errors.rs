//! Error types for the evaluator

use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// Failures loading evaluation inputs (collections, component libraries).
///
/// Evaluation itself never fails: unknown collections or components fall back
/// to the node's authored content.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
