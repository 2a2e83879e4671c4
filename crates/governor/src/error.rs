//! Governor Error Types
//!
//! Setup errors (`InvalidRules`, `Ledger`, `WorkingDirectory`) are returned to
//! whoever builds the [`Plugin`](crate::Plugin). Asset errors are raised by
//! [`Compilation`](crate::Compilation) hosts; the governor logs them and moves
//! on to the next asset.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A governor error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for governor operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A configured rule does not compile
    #[display("invalid control rules")]
    InvalidRules,
    /// Ledger snapshot location is unusable
    #[display("invalid ledger location: {}", _0.display())]
    Ledger(#[error(not(source))] PathBuf),
    /// Current working directory could not be determined
    #[display("cannot determine working directory")]
    WorkingDirectory,
    /// Host has no asset with this name
    #[display("asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// Rename target is already taken by another asset
    #[display("asset already exists: {_0}")]
    AssetExists(#[error(not(source))] String),
    /// Host failed to update the asset
    #[display("failed to update asset: {_0}")]
    Asset(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Asset(_))
    }
}
