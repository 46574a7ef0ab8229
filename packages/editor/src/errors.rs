//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate node ids: {}", .0.join(", "))]
    DuplicateIds(Vec<String>),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
