//! Error types for the assetprep engines.
//!
//! Every fatal condition of both tools maps to a dedicated variant so the
//! CLI can surface a descriptive message and exit non-zero. The only
//! tolerated condition, a missing sidecar for an image, is reported through
//! [`crate::normalize::NormalizeReport`] rather than an error.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for asset preparation operations.
#[derive(Debug, Error)]
pub enum PrepError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Filename convention errors
    #[error("No PNGs found in {0}")]
    NoImages(PathBuf),

    #[error("Can't extract number from: {name}")]
    Unnumbered { name: String },

    #[error("Token {token} appears twice: {first} and {second}")]
    DuplicateToken {
        token: u64,
        first: PathBuf,
        second: PathBuf,
    },

    // Renumbering errors
    #[error("Found token {token} < start {start}. Set --start correctly.")]
    IndexUnderflow { token: u64, start: u64 },

    #[error(
        "Output in {dir} is not contiguous from 0..{expected_last}. Check filename numbering and --start."
    )]
    Discontiguous { dir: PathBuf, expected_last: u64 },

    // Splitter errors
    #[error("Not enough files in {dir}: png={pngs} json={jsons} need={need}")]
    Shortfall {
        dir: PathBuf,
        pngs: usize,
        jsons: usize,
        need: usize,
    },
}

/// Result type alias for asset preparation operations.
pub type Result<T> = std::result::Result<T, PrepError>;

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        PrepError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl PrepError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        PrepError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}
