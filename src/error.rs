//! Error handling for airfoil ingestion.
//!
//! Provides error types with context for text parsing, pressure resampling,
//! configuration lookup and storage failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Malformed input in {path} at line {line}: {reason}")]
    MalformedInput {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Missing configuration: environment variable {key} is not set")]
    MissingConfiguration { key: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid ingestion request: {reason}")]
    InvalidRequest { reason: String },

    #[error(
        "Pressure distribution {path} too short: {available} points cannot supply {requested} samples"
    )]
    ResampleUnderflow {
        path: PathBuf,
        available: usize,
        requested: usize,
    },

    #[error("Pressure distributions do not line up with polar rows: {reason}")]
    PressureMismatch { reason: String },

    #[error("Pressure sample serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Directory traversal error: {0}")]
    DirectoryTraversal(#[from] walkdir::Error),
}

impl IngestError {
    /// Create a malformed input error for a specific line of a file
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<postgres::Error> for IngestError {
    fn from(error: postgres::Error) -> Self {
        Self::Storage {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
