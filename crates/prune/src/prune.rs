use crate::error::{ErrorKind, Result};
use crate::options::DeleteOptions;
use crate::path::{to_slash, validate};
use exn::ResultExt;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Stale names compiled into one glob set.
struct StalePatterns {
    set: GlobSet,
    /// Per glob: whether the pattern itself names a hidden entry, which makes
    /// it eligible even when `dot` is off.
    explicit_dot: Vec<bool>,
}
impl StalePatterns {
    fn compile<S: AsRef<str>>(stale: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut explicit_dot = Vec::new();
        for name in stale {
            let name = name.as_ref();
            let Ok(normalized) = validate(name) else {
                tracing::warn!(pattern = name, "Ignoring stale name outside the output directory");
                continue;
            };
            let pattern = to_slash(&normalized);
            match glob(&pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    explicit_dot.push(pattern.split('/').any(|segment| segment.starts_with('.')));
                },
                Err(err) => tracing::warn!(pattern = name, error = ?err, "Ignoring stale name that is not a valid glob"),
            }
        }
        let set = builder.build().or_raise(|| ErrorKind::InvalidGlob("stale names".to_string()))?;
        Ok(Self { set, explicit_dot })
    }

    /// Whether `relative` should be pruned, honouring the `dot` option.
    fn matches(&self, relative: &str, dot: bool) -> bool {
        let hits = self.set.matches(relative);
        if hits.is_empty() {
            return false;
        }
        dot || !is_hidden(relative) || hits.iter().any(|&i| self.explicit_dot[i])
    }
}

/// Paths that must survive: the current build's assets, anything containing
/// them, and the caller's extra ignore globs.
struct Protection {
    assets: HashSet<PathBuf>,
    ignore: GlobSet,
}
impl Protection {
    fn new<C: AsRef<str>>(current: &[C], ignore: &[String]) -> Result<Self> {
        let assets = current.iter().filter_map(|name| validate(name.as_ref()).ok()).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in ignore {
            builder.add(glob(pattern).or_raise(|| ErrorKind::InvalidGlob(pattern.clone()))?);
        }
        let ignore = builder.build().or_raise(|| ErrorKind::InvalidGlob("ignore".to_string()))?;
        Ok(Self { assets, ignore })
    }

    fn covers(&self, root: &Path, relative: &Path, is_dir: bool) -> bool {
        if self.assets.contains(relative) || self.ignore.is_match(to_slash(relative)) {
            return true;
        }
        if !is_dir {
            return false;
        }
        if self.assets.iter().any(|asset| asset.starts_with(relative)) {
            return true;
        }
        !self.ignore.is_empty()
            && WalkDir::new(root.join(relative))
                .min_depth(1)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.path().strip_prefix(root).map(Path::to_path_buf).ok())
                .any(|child| self.ignore.is_match(to_slash(&child)))
    }
}

fn glob(pattern: &str) -> std::result::Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

fn is_hidden(relative: &str) -> bool {
    relative.split('/').any(|segment| segment.starts_with('.'))
}

/// Deletes everything under `root` matched by a `stale` name, except the
/// `current` build's assets.
///
/// Each stale name is a glob rooted at `root` (`*` stays within one path
/// segment, `**` crosses segments). Matched directories are removed with
/// their contents, unless they hold a current asset or an ignored path, in
/// which case they are left alone.
///
/// Failing to delete one path is logged and does not stop the others. The
/// returned list holds the absolute paths that were removed (or, in a dry
/// run, would have been).
///
/// # Errors
/// Only for problems that make pruning unsafe to attempt: a relative or
/// non-directory `root`, or an `ignore` glob that does not compile. A `root`
/// that does not exist yet has nothing to prune.
#[instrument(skip_all, fields(root = %root.display(), stale = stale.len()))]
pub fn prune<S: AsRef<str>, C: AsRef<str>>(
    stale: &[S],
    root: &Path,
    current: &[C],
    options: &DeleteOptions,
) -> Result<Vec<PathBuf>> {
    if !root.is_absolute() {
        exn::bail!(ErrorKind::InvalidRoot(root.to_path_buf()));
    }
    if !root.exists() {
        return Ok(Vec::new());
    }
    if !root.is_dir() {
        exn::bail!(ErrorKind::InvalidRoot(root.to_path_buf()));
    }

    let patterns = StalePatterns::compile(stale)?;
    let protection = Protection::new(current, &options.ignore)?;
    let candidates = collect_candidates(root, &patterns, &protection, options);

    if options.dry_run {
        for path in &candidates {
            tracing::debug!(path = %path.display(), "Would remove stale output");
        }
        return Ok(candidates);
    }

    let mut removed = Vec::with_capacity(candidates.len());
    for path in candidates {
        match remove(&path) {
            Ok(()) => removed.push(path),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "Failed to remove stale output; continuing"),
        }
    }
    Ok(removed)
}

fn collect_candidates(
    root: &Path,
    patterns: &StalePatterns,
    protection: &Protection,
    options: &DeleteOptions,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read output directory entry; skipping");
                continue;
            },
        };
        // Infallible: the walk starts at `root`, so every entry lives under it.
        let Ok(relative) = entry.path().strip_prefix(root) else { continue };
        if !patterns.matches(&to_slash(relative), options.dot) {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        if protection.covers(root, relative, is_dir) {
            tracing::debug!(path = %relative.display(), "Stale output is protected; keeping");
            continue;
        }
        if !options.force && entry.metadata().map(|m| m.permissions().readonly()).unwrap_or(false) {
            tracing::warn!(path = %relative.display(), "Stale output is read-only; skipping without force");
            continue;
        }
        if is_dir {
            // The whole directory goes; its contents need no separate visit.
            walker.skip_current_dir();
        }
        candidates.push(entry.into_path());
    }
    candidates
}

fn remove(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn output_dir(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"data").unwrap();
        }
        dir
    }

    fn relative(root: &Path, removed: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<_> = removed.iter().map(|p| to_slash(p.strip_prefix(root).unwrap())).collect();
        names.sort();
        names
    }

    #[test]
    fn test_removes_stale_files() {
        let dir = output_dir(&["a.js", "b.js", "c.js"]);
        let removed = prune(&["b.js"], dir.path(), &["a.js", "c.js"], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["b.js"]);
        assert!(!dir.path().join("b.js").exists());
        assert!(dir.path().join("a.js").exists());
        assert!(dir.path().join("c.js").exists());
    }

    #[test]
    fn test_never_removes_current_assets() {
        let dir = output_dir(&["js/app.js", "js/old.js"]);
        let removed = prune(&["js/*.js"], dir.path(), &["js/app.js"], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["js/old.js"]);
        assert!(dir.path().join("js/app.js").exists());
    }

    #[test]
    fn test_keeps_directory_holding_current_asset() {
        let dir = output_dir(&["legacy/keep.js", "legacy/drop.js"]);
        let removed = prune(&["legacy"], dir.path(), &["legacy/keep.js"], &DeleteOptions::default()).unwrap();
        assert!(removed.is_empty());
        assert!(dir.path().join("legacy/keep.js").exists());
    }

    #[test]
    fn test_removes_stale_directory() {
        let dir = output_dir(&["legacy/a.js", "legacy/nested/b.js", "app.js"]);
        let removed = prune(&["legacy"], dir.path(), &["app.js"], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["legacy"]);
        assert!(!dir.path().join("legacy").exists());
    }

    #[test]
    fn test_star_does_not_cross_separator() {
        let dir = output_dir(&["a.map", "js/b.map"]);
        let removed = prune(&["*.map"], dir.path(), &[] as &[&str], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["a.map"]);
        let removed = prune(&["**/*.map"], dir.path(), &[] as &[&str], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["js/b.map"]);
    }

    #[test]
    fn test_hidden_entries() {
        let dir = output_dir(&[".cache/x.js", "y.js"]);
        let no_dot = DeleteOptions { dot: false, ..DeleteOptions::default() };
        let removed = prune(&["**/*.js"], dir.path(), &[] as &[&str], &no_dot).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["y.js"]);
        // Naming the hidden entry explicitly still works without `dot`.
        let removed = prune(&[".cache/x.js"], dir.path(), &[] as &[&str], &no_dot).unwrap();
        assert_eq!(relative(dir.path(), &removed), [".cache/x.js"]);
    }

    #[test]
    fn test_hidden_entries_eligible_by_default() {
        let dir = output_dir(&[".cache/x.js"]);
        let removed = prune(&["**/*.js"], dir.path(), &[] as &[&str], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), [".cache/x.js"]);
    }

    #[test]
    fn test_dry_run_reports_without_removing() {
        let dir = output_dir(&["old.js"]);
        let options = DeleteOptions::default().with_dry_run(true);
        let removed = prune(&["old.js"], dir.path(), &[] as &[&str], &options).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["old.js"]);
        assert!(dir.path().join("old.js").exists());
    }

    #[test]
    fn test_ignore_is_additive() {
        let dir = output_dir(&["keep/a.js", "drop/b.js"]);
        let options = DeleteOptions { ignore: vec!["keep/**".to_string()], ..DeleteOptions::default() };
        let removed = prune(&["keep/a.js", "drop"], dir.path(), &[] as &[&str], &options).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["drop"]);
        assert!(dir.path().join("keep/a.js").exists());
    }

    #[test]
    fn test_ignore_protects_parent_directory() {
        let dir = output_dir(&["assets/keep.png", "assets/old.png"]);
        let options = DeleteOptions { ignore: vec!["**/*.png".to_string()], ..DeleteOptions::default() };
        let removed = prune(&["assets"], dir.path(), &[] as &[&str], &options).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_read_only_requires_force() {
        let dir = output_dir(&["locked.js"]);
        let path = dir.path().join("locked.js");
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let gentle = DeleteOptions { force: false, ..DeleteOptions::default() };
        assert!(prune(&["locked.js"], dir.path(), &[] as &[&str], &gentle).unwrap().is_empty());
        assert!(path.exists());

        let removed = prune(&["locked.js"], dir.path(), &[] as &[&str], &DeleteOptions::default()).unwrap();
        assert_eq!(relative(dir.path(), &removed), ["locked.js"]);
    }

    #[test]
    fn test_traversal_names_are_ignored() {
        let outer = tempfile::tempdir().unwrap();
        fs::write(outer.path().join("secret.txt"), b"data").unwrap();
        let root = outer.path().join("dist");
        fs::create_dir(&root).unwrap();
        let removed = prune(&["../secret.txt"], &root, &[] as &[&str], &DeleteOptions::default()).unwrap();
        assert!(removed.is_empty());
        assert!(outer.path().join("secret.txt").exists());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("not-built-yet");
        assert!(prune(&["a.js"], &root, &[] as &[&str], &DeleteOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_root_and_ignore() {
        let err = prune(&["a.js"], Path::new("relative"), &[] as &[&str], &DeleteOptions::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidRoot(_)));

        let dir = output_dir(&["a.js"]);
        let options = DeleteOptions { ignore: vec!["[".to_string()], ..DeleteOptions::default() };
        let err = prune(&["a.js"], dir.path(), &[] as &[&str], &options).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidGlob(_)));
        assert!(dir.path().join("a.js").exists());
    }
}
