//! Snapshot store trait and implementations.
//!
//! A [`SnapshotStore`] holds exactly one document: the newline-delimited list
//! of asset names written after the last successful build. The ledger never
//! touches the filesystem directly, so tests can swap in an in-memory store.

mod file;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod ro;

pub use self::file::FileStore;
#[cfg(any(test, feature = "mock"))]
pub use self::memory::MemoryStore;
pub use self::ro::ReadOnlyStore;
use crate::error::Result;
use async_trait::async_trait;

/// Unified interface for snapshot stores.
///
/// # Examples
///
/// ```no_run
/// use outctl_ledger::store::{FileStore, SnapshotStore};
/// # use outctl_ledger::error::Result;
/// # async fn example() -> Result<()> {
/// let store = FileStore::new("/path/to/project/.outctl-ledger")?;
/// store.write("js/app.js\ncss/app.css").await?;
/// assert_eq!(store.read().await?, "js/app.js\ncss/app.css");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Human-readable location of the snapshot (used for logging only).
    fn name(&self) -> &str;

    /// Read the raw snapshot.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) when nothing
    /// has been written yet.
    async fn read(&self) -> Result<String>;

    /// Replace the snapshot.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed.
    async fn write(&self, contents: &str) -> Result<()>;

    /// Remove the snapshot. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}
