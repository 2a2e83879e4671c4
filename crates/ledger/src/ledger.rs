use crate::StoreHandle;
use crate::snapshot;
use std::collections::HashSet;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Names present in `previous` but missing from `current`.
///
/// Membership is a set comparison, so input order never changes which names
/// come back, and duplicates in either input never produce duplicate output.
/// The result keeps the order of `previous`.
///
/// ```
/// use outctl_ledger::diff_stale;
///
/// let stale = diff_stale(["a", "b", "c"], ["d", "c", "a"]);
/// assert_eq!(stale, vec!["b".to_string()]);
/// ```
pub fn diff_stale<'a, 'b>(
    previous: impl IntoIterator<Item = &'a str>,
    current: impl IntoIterator<Item = &'b str>,
) -> Vec<String> {
    let current: HashSet<&str> = current.into_iter().collect();
    snapshot::unique(previous.into_iter().filter(|name| !current.contains(name)))
}

/// The asset names recorded by the last successful build.
///
/// Owns its [`SnapshotStore`](crate::store::SnapshotStore) handle. The
/// in-memory list is the source of truth during a process; the store only
/// carries it across restarts.
pub struct AssetLedger {
    store: StoreHandle,
    previous: Vec<String>,
    pending: Option<JoinHandle<()>>,
}
impl AssetLedger {
    /// Load the previous build's names from `store`.
    ///
    /// Never fails: a missing, unreadable or corrupt snapshot means no
    /// previous build is known and the ledger starts empty.
    #[instrument(skip_all, fields(store = store.name()))]
    pub async fn load(store: StoreHandle) -> Self {
        let previous = match store.read().await {
            Ok(contents) => snapshot::parse(&contents),
            Err(err) => {
                tracing::debug!(error = ?err, "No usable ledger snapshot; starting empty");
                Vec::new()
            },
        };
        Self { store, previous, pending: None }
    }

    pub fn previous(&self) -> &[String] {
        &self.previous
    }

    /// Names recorded by the last build that `current` no longer contains.
    pub fn stale<'a>(&self, current: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        diff_stale(self.previous.iter().map(String::as_str), current)
    }

    /// Record `current` as the latest successful build.
    ///
    /// The in-memory list is replaced straight away. Persisting happens on a
    /// background task so the build is never held up by it; a failed write is
    /// logged and the in-memory list is kept regardless. Writes queued by
    /// earlier saves finish before this one starts.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn save<S: AsRef<str>>(&mut self, current: &[S]) {
        self.previous = snapshot::unique(current.iter().map(AsRef::as_ref));
        let contents = snapshot::render(&self.previous);
        let store = self.store.clone();
        let earlier = self.pending.take();
        self.pending = Some(tokio::spawn(async move {
            if let Some(earlier) = earlier {
                _ = earlier.await;
            }
            match store.write(&contents).await {
                Ok(()) => tracing::debug!(store = store.name(), "Ledger snapshot written"),
                Err(err) => tracing::error!(store = store.name(), error = ?err, "Failed to write ledger snapshot"),
            }
        }));
    }

    /// Wait for any background write started by [`save`](Self::save).
    pub async fn settle(&mut self) {
        if let Some(pending) = self.pending.take()
            && let Err(err) = pending.await
        {
            tracing::error!(error = %err, "Ledger snapshot task did not complete");
        }
    }

    /// Forget every recorded name, in memory and in the store.
    pub async fn reset(&mut self) -> crate::error::Result<()> {
        self.settle().await;
        self.previous.clear();
        self.store.clear().await
    }
}
