//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The input file lacks one or more required header columns.
    #[error("malformed input {}: missing column(s) {}", .path.display(), .missing.join(", "))]
    MalformedInput {
        /// Path (or label) of the offending source.
        path: PathBuf,
        /// Required headers that were not found.
        missing: Vec<String>,
    },

    /// Reading the input file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited input could not be parsed.
    #[error("delimited input error: {0}")]
    Csv(#[from] csv::Error),

    /// The embedded store rejected an operation.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
