//! In-memory snapshot store for testing.

use crate::error::{ErrorKind, Result};
use crate::store::SnapshotStore;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory snapshot store for testing.
///
/// Besides holding the snapshot, it counts successful writes so tests can
/// assert that a build did (or did not) advance the ledger, and it can be
/// told to fail every write.
///
/// # Examples
///
/// ```
/// use outctl_ledger::store::{MemoryStore, SnapshotStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::with_snapshot("a.js\nb.js");
/// assert_eq!(store.read().await?, "a.js\nb.js");
/// store.write("c.js").await?;
/// assert_eq!(store.writes(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}
impl MemoryStore {
    pub fn with_snapshot(contents: impl Into<String>) -> Self {
        Self {
            snapshot: RwLock::new(Some(contents.into())),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail with a store error.
    pub fn fail_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Number of writes that succeeded.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current snapshot, without going through the async trait.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.try_read().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<String> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(PathBuf::from("memory"))))
    }

    async fn write(&self, contents: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::StoreError("writes disabled".to_string()));
        }
        *self.snapshot.write().await = Some(contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.snapshot.write().await = None;
        Ok(())
    }
}
