//! Layered configuration for outctl.
//!
//! Sources are merged lowest-priority first:
//!
//! 1. built-in defaults ([`Config::default`], filled in for any unset key);
//! 2. the user configuration directory (`config.{toml,yaml,yml,json}`);
//! 3. the project file (`outctl.{toml,yaml,yml,json}`), or one explicit file;
//! 4. `OUTCTL_` environment variables, nesting with `__`
//!    (`OUTCTL_DEL_OPTIONS__DRY_RUN=true`).
//!
//! ```toml
//! output = "dist"
//! verbose = true
//!
//! [[control]]
//! test = { pattern = '\.map$' }
//!
//! [del_options]
//! ignore = ["static/**"]
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use outctl_prune::DeleteOptions;
use outctl_rules::spec::RuleSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the project configuration file.
pub const PROJECT_FILE: &str = "outctl";
/// Prefix of the environment variables that override configuration.
pub const ENV_PREFIX: &str = "OUTCTL_";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Build output directory. Without one the governor stays disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Ledger snapshot location; defaults to `.outctl-ledger` in the working
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger: Option<PathBuf>,
    pub control: Vec<RuleSpec>,
    #[serde(alias = "delOptions")]
    pub del_options: DeleteOptions,
    pub verbose: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            output: None,
            ledger: None,
            control: Vec::new(),
            del_options: DeleteOptions::default(),
            verbose: true,
        }
    }
}
impl Config {
    /// Loads configuration for the project in `project_dir`.
    pub fn load(project_dir: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let mut loader = Loader::new(project_dir);
        if let Some(path) = explicit {
            loader = loader.with_file(path);
        }
        loader.load()
    }

    /// The output directory, with relative paths resolved against `base`.
    pub fn output_dir(&self, base: &Path) -> Option<PathBuf> {
        self.output.as_ref().map(|path| base.join(path))
    }

    /// The ledger snapshot path, with relative paths resolved against `base`.
    pub fn ledger_path(&self, base: &Path) -> Option<PathBuf> {
        self.ledger.as_ref().map(|path| base.join(path))
    }
}

/// Builds the merged [`Figment`] behind [`Config::load`].
#[derive(Clone, Debug)]
pub struct Loader {
    project_dir: PathBuf,
    user_dir: Option<PathBuf>,
    explicit: Option<PathBuf>,
}
impl Loader {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            user_dir: ProjectDirs::from("", "", "outctl").map(|dirs| dirs.config_dir().to_path_buf()),
            explicit: None,
        }
    }

    /// Reads this file instead of searching the project directory.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Skips the per-user configuration directory.
    pub fn without_user_config(mut self) -> Self {
        self.user_dir = None;
        self
    }

    pub fn figment(&self) -> Result<Figment> {
        // Defaults come from `#[serde(default)]` at extraction. A serialized
        // defaults layer would clash with the `delOptions`/`dryRun` aliases.
        let mut figment = Figment::new();
        if let Some(path) = self.user_dir.as_deref().and_then(|dir| find(dir, "config")) {
            tracing::debug!(path = %path.display(), "Merging user configuration");
            figment = merge_file(figment, &path)?;
        }
        match &self.explicit {
            Some(path) => {
                let path = self.project_dir.join(path);
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path));
                }
                figment = merge_file(figment, &path)?;
            },
            None => {
                if let Some(path) = find(&self.project_dir, PROJECT_FILE) {
                    tracing::debug!(path = %path.display(), "Merging project configuration");
                    figment = merge_file(figment, &path)?;
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(&self) -> Result<Config> {
        self.figment()?.extract().or_raise(|| ErrorKind::Invalid)
    }
}

fn find(dir: &Path, stem: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|extension| dir.join(format!("{stem}.{extension}")))
        .find(|path| path.is_file())
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}
