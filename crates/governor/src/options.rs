use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use outctl_config::Config;
use outctl_prune::DeleteOptions;
use outctl_rules::Rules;
use std::path::PathBuf;

/// Everything the governor needs besides the output directory.
#[derive(Clone, Debug)]
pub struct PluginOptions {
    /// Redirect rules applied to every emitted asset.
    pub control: Rules,
    /// How stale output is removed.
    pub delete: DeleteOptions,
    /// Gates the advisory warnings and the per-file removal report.
    pub verbose: bool,
    /// Ledger snapshot path. Relative paths are resolved against the working
    /// directory; `None` means `.outctl-ledger` there.
    pub ledger: Option<PathBuf>,
}
impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            control: Rules::default(),
            delete: DeleteOptions::default(),
            verbose: true,
            ledger: None,
        }
    }
}

impl TryFrom<Config> for PluginOptions {
    type Error = Error;

    /// Compiles the configured rules. An invalid pattern fails here, before
    /// any build runs.
    fn try_from(config: Config) -> Result<Self, Self::Error> {
        Ok(Self {
            control: Rules::from_specs(&config.control).or_raise(|| ErrorKind::InvalidRules)?,
            delete: config.del_options,
            verbose: config.verbose,
            ledger: config.ledger,
        })
    }
}
