//! The asset ledger: which output files the last successful build produced.
//!
//! After each error-free build, the adapter records the build's final asset
//! names with [`AssetLedger::save`]. On the next build, [`AssetLedger::stale`]
//! returns every recorded name that is no longer produced, and those are the
//! files the pruner removes.
//!
//! The ledger survives restarts through a [`SnapshotStore`]: a flat,
//! newline-delimited list of names (see [`snapshot`]).

pub mod error;
mod ledger;
pub mod snapshot;
pub mod store;

pub use crate::ledger::{AssetLedger, diff_stale};
pub use crate::store::SnapshotStore;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn SnapshotStore + Send + Sync>;

/// File name used for the ledger snapshot when none is configured.
pub const DEFAULT_SNAPSHOT: &str = ".outctl-ledger";
