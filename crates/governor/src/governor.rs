use crate::compilation::{AssetAction, BuildResult, Compilation};
use crate::error::{ErrorKind, Result};
use crate::options::PluginOptions;
use exn::ResultExt;
use outctl_ledger::store::{FileStore, ReadOnlyStore};
use outctl_ledger::{AssetLedger, DEFAULT_SNAPSHOT, StoreHandle};
use outctl_prune::DeleteOptions;
use outctl_rules::{Redirect, Rules};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Where a [`Governor`] is in the current build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a build to emit assets.
    #[default]
    Idle,
    /// Emitted assets have been redirected.
    Emitting,
    /// The build finished cleanly; stale output is being reconciled.
    Finalizing,
    /// Reconciliation finished.
    Done,
    /// The build reported errors, so cleanup was skipped.
    Errored,
}

/// Outcome of [`Governor::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The build had errors; the ledger and the output directory are untouched.
    Skipped,
    Settled {
        /// Names the previous build produced and this one did not.
        stale: Vec<String>,
        /// Absolute paths removed from the output directory.
        removed: Vec<PathBuf>,
    },
}

/// Configured but not yet attached to an output directory.
pub struct Plugin {
    options: PluginOptions,
    store: StoreHandle,
    cwd: PathBuf,
}
impl Plugin {
    /// Uses the working directory as the base for relative paths.
    pub fn new(options: PluginOptions) -> Result<Self> {
        let cwd = std::env::current_dir().or_raise(|| ErrorKind::WorkingDirectory)?;
        Self::in_dir(options, cwd)
    }

    /// Like [`new`](Self::new) with an explicit base directory.
    ///
    /// The ledger lives in a file (see [`PluginOptions::ledger`]). A dry run
    /// wraps it read-only so the snapshot is never advanced.
    pub fn in_dir(options: PluginOptions, cwd: impl Into<PathBuf>) -> Result<Self> {
        let cwd = cwd.into();
        let path = cwd.join(options.ledger.as_deref().unwrap_or(Path::new(DEFAULT_SNAPSHOT)));
        let store: StoreHandle = Arc::new(FileStore::new(&path).or_raise(|| ErrorKind::Ledger(path.clone()))?);
        let store: StoreHandle = match options.delete.dry_run {
            true => Arc::new(ReadOnlyStore::new(store)),
            false => store,
        };
        Ok(Self { options, store, cwd })
    }

    /// Uses `store` for the ledger instead of a file.
    pub fn with_store(options: PluginOptions, store: StoreHandle, cwd: impl Into<PathBuf>) -> Self {
        Self { options, store, cwd: cwd.into() }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Attach to the build's output directory and load the ledger.
    ///
    /// Without an output directory there is nothing to govern: a warning is
    /// logged (whatever `verbose` says) and no governor is returned.
    pub async fn apply(self, output: Option<PathBuf>) -> Option<Governor> {
        let Some(output) = output else {
            tracing::warn!("No output directory configured; outctl will not redirect or prune anything");
            return None;
        };
        let output = self.cwd.join(output);
        let ledger = AssetLedger::load(self.store).await;
        tracing::debug!(output = %output.display(), previous = ledger.previous().len(), "Governor attached");
        Some(Governor {
            rules: self.options.control,
            delete: self.options.delete,
            verbose: self.options.verbose,
            output,
            cwd: self.cwd,
            ledger,
            phase: Phase::Idle,
        })
    }
}

/// Drives one output directory through successive builds.
///
/// Each build calls [`finalize_assets`](Self::finalize_assets) (or
/// [`plan`](Self::plan) for a dry look) once its assets are named, then
/// [`complete`](Self::complete) once it is done.
pub struct Governor {
    rules: Rules,
    delete: DeleteOptions,
    verbose: bool,
    output: PathBuf,
    cwd: PathBuf,
    ledger: AssetLedger,
    phase: Phase,
}
impl Governor {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn ledger(&self) -> &AssetLedger {
        &self.ledger
    }

    /// The renames and deletions the rules call for. Unchanged names are left
    /// out.
    pub fn plan<S: AsRef<str>>(&self, names: &[S]) -> Vec<AssetAction> {
        names
            .iter()
            .map(AsRef::as_ref)
            .filter_map(|name| match self.rules.redirect(name) {
                Redirect::Unchanged(_) => None,
                Redirect::Renamed(to) => Some(AssetAction::Rename { from: name.to_string(), to }),
                Redirect::Deleted => Some(AssetAction::Delete { name: name.to_string() }),
            })
            .collect()
    }

    /// Redirect every asset `compilation` has emitted.
    ///
    /// Names are read once up front, so each asset is visited exactly once
    /// even as renames add new names. A host failure on one asset is logged
    /// and the rest are still processed. Returns the actions that succeeded.
    #[instrument(skip_all)]
    pub fn finalize_assets(&mut self, compilation: &mut impl Compilation) -> Vec<AssetAction> {
        self.phase = Phase::Emitting;
        let names = compilation.asset_names();
        let mut applied = Vec::new();
        for action in self.plan(&names) {
            match action.apply(compilation) {
                Ok(()) => {
                    tracing::debug!(?action, "Asset redirected");
                    applied.push(action);
                },
                Err(err) => tracing::warn!(?action, error = ?err, "Failed to redirect asset; continuing"),
            }
        }
        applied
    }

    /// Reconcile the output directory with a finished build.
    ///
    /// A build with errors changes nothing. Otherwise the ledger's names that
    /// the build no longer produced are pruned from the output directory and
    /// the build's names become the new ledger. The ledger write continues in
    /// the background; [`settle`](Self::settle) waits for it.
    #[instrument(skip_all, fields(assets = result.assets.len(), has_errors = result.has_errors))]
    pub async fn complete(&mut self, result: BuildResult) -> Completion {
        if result.has_errors {
            self.phase = Phase::Errored;
            if self.verbose {
                tracing::warn!("Build has errors; pausing output cleanup");
            }
            return Completion::Skipped;
        }
        self.phase = Phase::Finalizing;
        let stale = self.ledger.stale(result.assets.iter().map(String::as_str));
        self.ledger.save(&result.assets);
        let removed = match stale.is_empty() {
            true => Vec::new(),
            false => self.prune(&stale, result.assets).await,
        };
        self.phase = Phase::Done;
        Completion::Settled { stale, removed }
    }

    /// Wait for the background ledger write.
    pub async fn settle(&mut self) {
        self.ledger.settle().await;
    }

    async fn prune(&self, stale: &[String], current: Vec<String>) -> Vec<PathBuf> {
        let stale = stale.to_vec();
        let output = self.output.clone();
        let options = self.delete.clone();
        let task = tokio::task::spawn_blocking(move || outctl_prune::prune(&stale, &output, &current, &options));
        let removed = match task.await {
            Ok(Ok(removed)) => removed,
            Ok(Err(err)) => {
                tracing::error!(error = ?err, "Failed to prune stale output");
                return Vec::new();
            },
            Err(err) => {
                tracing::error!(error = %err, "Prune task did not complete");
                return Vec::new();
            },
        };
        if self.verbose {
            for path in &removed {
                let shown = path.strip_prefix(&self.cwd).unwrap_or(path);
                match self.delete.dry_run {
                    true => tracing::info!(path = %shown.display(), "Would remove"),
                    false => tracing::info!(path = %shown.display(), "Removed"),
                }
            }
        }
        removed
    }
}
