//! Prune Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A prune error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for prune operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Failing to delete one stale path is not an error at this level: the pruner
/// logs it and moves on to the next path.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Output directory is relative, or exists but is not a directory
    #[display("invalid output directory: {}", _0.display())]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// Path contains invalid characters or escapes the output directory
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A glob (stale name or ignore pattern) failed to compile
    #[display("invalid glob: {_0}")]
    InvalidGlob(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
