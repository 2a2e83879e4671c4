//! Build lifecycle adapter.
//!
//! A host build drives a [`Governor`] through two hooks per build:
//!
//! 1. [`Governor::finalize_assets`] once assets are named but not yet
//!    written, to rename or drop them according to the control rules;
//! 2. [`Governor::complete`] once the build is over, to prune output the
//!    previous successful build produced and this one did not.
//!
//! A build that reports errors is never cleaned up after, and the ledger
//! keeps describing the last good build.
//!
//! ```no_run
//! use outctl_governor::{BuildResult, Plugin, PluginOptions};
//! # async fn example() -> outctl_governor::error::Result<()> {
//! let plugin = Plugin::new(PluginOptions::default())?;
//! if let Some(mut governor) = plugin.apply(Some("dist".into())).await {
//!     governor.complete(BuildResult::succeeded(["js/app.js"])).await;
//!     governor.settle().await;
//! }
//! # Ok(())
//! # }
//! ```

mod compilation;
pub mod error;
mod governor;
mod options;

pub use crate::compilation::{AssetAction, BuildResult, Compilation};
pub use crate::governor::{Completion, Governor, Phase, Plugin};
pub use crate::options::PluginOptions;
