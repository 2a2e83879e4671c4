//! A build host backed by a plain directory.
//!
//! Whatever produced the files has already written them, so "emitted" assets
//! are the manifest entries that exist under the output directory. Renaming
//! moves the file and deleting removes it, unless the host is in a dry run,
//! in which case only the in-memory names change.

use exn::ResultExt;
use outctl_governor::Compilation;
use outctl_governor::error::{ErrorKind, Result};
use outctl_prune::validate_path;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DirectoryCompilation {
    root: PathBuf,
    assets: BTreeSet<String>,
    dry_run: bool,
}
impl DirectoryCompilation {
    /// Keeps the `names` that are files under `root`. Anything else is logged
    /// and left out.
    pub fn new<S: AsRef<str>>(root: impl Into<PathBuf>, names: &[S], dry_run: bool) -> Self {
        let root = root.into();
        let assets = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| match validate_path(name) {
                Ok(path) if root.join(&path).is_file() => true,
                Ok(_) => {
                    tracing::warn!(name, "Manifest entry not found in output directory; skipping");
                    false
                },
                Err(err) => {
                    tracing::warn!(name, error = ?err, "Manifest entry is not a valid asset name; skipping");
                    false
                },
            })
            .map(str::to_string)
            .collect();
        Self { root, assets, dry_run }
    }

    fn path(&self, name: &str) -> Result<PathBuf> {
        let relative = validate_path(name).or_raise(|| ErrorKind::Asset(name.to_string()))?;
        Ok(self.root.join(relative))
    }
}

impl Compilation for DirectoryCompilation {
    fn asset_names(&self) -> Vec<String> {
        self.assets.iter().cloned().collect()
    }

    fn rename_asset(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.assets.contains(from) {
            exn::bail!(ErrorKind::AssetNotFound(from.to_string()));
        }
        // Another asset of this build owns the name. A file left on disk by an
        // earlier build is plain old output and gets replaced.
        if self.assets.contains(to) {
            exn::bail!(ErrorKind::AssetExists(to.to_string()));
        }
        let target = self.path(to)?;
        if !self.dry_run {
            move_file(&self.path(from)?, &target).or_raise(|| ErrorKind::Asset(from.to_string()))?;
        }
        self.assets.remove(from);
        self.assets.insert(to.to_string());
        Ok(())
    }

    fn delete_asset(&mut self, name: &str) -> Result<()> {
        if !self.assets.contains(name) {
            exn::bail!(ErrorKind::AssetNotFound(name.to_string()));
        }
        if !self.dry_run {
            fs::remove_file(self.path(name)?).or_raise(|| ErrorKind::Asset(name.to_string()))?;
        }
        self.assets.remove(name);
        Ok(())
    }
}

fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)
}

/// Parses a manifest: one asset name per line, blank lines ignored.
pub fn parse_manifest(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
