//! Path validation for names relative to the output directory.
//!
//! Asset names and stale patterns both come from outside (the host, or a
//! snapshot written by an older build), so they are normalized before use and
//! anything that would leave the output directory is rejected.

use crate::error::{ErrorKind, Result};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Normalizes an asset name (or stale pattern) relative to the output
/// directory, rejecting anything that would resolve outside of it.
///
/// `.` segments, repeated and leading separators are dropped, and `..` is
/// folded into its parent. Glob metacharacters are kept as they are.
///
/// ```
/// use std::path::Path;
/// use outctl_prune::validate_path;
///
/// assert_eq!(validate_path("./js//app.js/").unwrap(), Path::new("js/app.js"));
/// assert_eq!(validate_path("js/../**/*.map").unwrap(), Path::new("**/*.map"));
/// assert!(validate_path("../app.js").is_err());
/// assert!(validate_path("a\0b").is_err());
/// ```
pub fn validate(name: impl AsRef<Path>) -> Result<PathBuf> {
    let name = name.as_ref();
    let invalid = || ErrorKind::InvalidPath(name.to_path_buf());
    let mut segments: Vec<&OsStr> = Vec::new();
    for component in name.components() {
        match component {
            // Unix paths may carry NUL, which syscalls would truncate at.
            Component::Normal(segment) if segment.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(segment) => segments.push(segment),
            Component::ParentDir => {
                segments.pop().ok_or_else(invalid)?;
            },
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::CurDir | Component::RootDir => {},
        }
    }
    if segments.is_empty() {
        exn::bail!(invalid());
    }
    Ok(segments.into_iter().collect())
}

/// Renders a relative path with `/` separators, the form globs are matched
/// against.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
