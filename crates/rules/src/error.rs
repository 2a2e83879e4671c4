//! Rule Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A rule construction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for rule construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Rules only fail while they are being built. Once constructed, evaluating
/// a rule against an asset name never fails.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A `pattern` matcher did not compile as a regular expression.
    #[display("invalid pattern: {_0}")]
    InvalidPattern(#[error(not(source))] String),
    /// The rule at the given position could not be built.
    #[display("invalid control rule at position {_0}")]
    InvalidRule(#[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
