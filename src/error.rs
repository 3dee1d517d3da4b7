//! Error types shared by the store, the collections and the command handlers.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for volta operations.
#[derive(Error, Debug)]
pub enum VoltaError {
    /// Filesystem failure while reading or writing the store or an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value or an input file is not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A form or CLI submission is missing required fields.
    #[error("{0}")]
    Validation(String),

    /// No record with the given id exists in the collection.
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// An import file does not carry the expected payload.
    #[error("Invalid file format: {0}")]
    InvalidImport(String),
}

impl VoltaError {
    /// Validation error with the standard required-fields wording.
    pub fn required_fields() -> Self {
        VoltaError::Validation("Please fill in all required fields (marked with *)".to_string())
    }
}

pub type Result<T> = std::result::Result<T, VoltaError>;
