//! Error types for coalign.
//!
//! Only configuration problems are reported as [`AlignError`]. Broken search
//! invariants are programming errors and panic instead.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AlignError>;

#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("failed to read scoring matrix {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scoring matrix at line {line}: {msg}")]
    Matrix { line: usize, msg: String },

    #[error("scoring matrix has no header line")]
    EmptyMatrix,

    #[error("no substitution score for pair ({a}, {b})")]
    MissingScore { a: char, b: char },

    #[error("frontier grew to {size} paths, above the configured limit of {limit}")]
    FrontierLimit { size: usize, limit: usize },
}

impl AlignError {
    pub(crate) fn matrix(line: usize, msg: impl Into<String>) -> Self {
        AlignError::Matrix {
            line,
            msg: msg.into(),
        }
    }
}
