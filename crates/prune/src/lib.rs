//! Removes stale build output from disk.
//!
//! [`prune`] takes the names the previous build produced but the current one
//! did not, treats each as a glob rooted at the output directory, and deletes
//! what matches. The current build's assets (and anything containing them)
//! are always protected, whatever the patterns say.

pub mod error;
mod options;
mod path;
mod prune;

pub use crate::options::DeleteOptions;
pub use crate::path::validate as validate_path;
pub use crate::prune::prune;
