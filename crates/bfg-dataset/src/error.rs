//! Error types for dataset access.

use std::path::PathBuf;

use harvest_common::TimeAxisError;
use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Error types for reading forecast datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Requested variable is not in the file
    #[error("Variable '{variable}' not found in {path}")]
    MissingVariable { variable: String, path: PathBuf },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Field values do not fit the declared or expected shape
    #[error("Shape mismatch for '{variable}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        variable: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Time axis cannot be decoded
    #[error("Time axis error: {0}")]
    TimeAxis(#[from] TimeAxisError),

    /// An empty file list was given
    #[error("No forecast files given")]
    NoFiles,
}

impl DatasetError {
    pub fn missing_variable(variable: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingVariable {
            variable: variable.into(),
            path: path.into(),
        }
    }

    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}
