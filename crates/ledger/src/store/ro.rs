//! Read-only snapshot store.
//!
//! Wraps another store and prevents write operations from executing, while
//! still indicating success on return. Used for dry runs.

use crate::StoreHandle;
use crate::error::Result;
use crate::store::SnapshotStore;
use async_trait::async_trait;

/// Read-only snapshot store.
///
/// Reads pass through to the wrapped store; writes and clears are dropped
/// with an [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyStore {
    inner: StoreHandle,
}
impl ReadOnlyStore {
    pub fn new(inner: StoreHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SnapshotStore for ReadOnlyStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn read(&self) -> Result<String> {
        self.inner.read().await
    }

    async fn write(&self, contents: &str) -> Result<()> {
        tracing::info!(store = self.name(), bytes = contents.len(), "Skipping ledger write during read-only mode");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        tracing::info!(store = self.name(), "Skipping ledger reset during read-only mode");
        Ok(())
    }
}
