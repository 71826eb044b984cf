//! Error types for shape guards

use thiserror::Error;

/// Result type for guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Guard errors
#[derive(Error, Debug)]
pub enum GuardError {
    /// The value failed the schema; `path` is the first mismatch in traversal order
    #[error("{path} does not match the schema.")]
    TypeMismatch { path: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GuardError {
    /// Path of the mismatch, if this is a conformance failure
    pub fn path(&self) -> Option<&str> {
        match self {
            GuardError::TypeMismatch { path } => Some(path),
            GuardError::Json(_) => None,
        }
    }
}
