//! Local filesystem snapshot store.
//!
//! The snapshot lives in a single file, accessed via `tokio::fs` for async I/O.

use crate::error::{ErrorKind, Result};
use crate::store::SnapshotStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Snapshot store backed by one file on the local filesystem.
///
/// # Examples
///
/// ```no_run
/// use outctl_ledger::store::FileStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileStore::new("/absolute/path/.outctl-ledger")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FileStore {
    name: String,
    path: PathBuf,
}
impl FileStore {
    /// Create a new file-backed store.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or if it points at an
    /// existing directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_absolute() || path.is_dir() {
            exn::bail!(ErrorKind::StoreError(format!("snapshot path `{}` must be an absolute file path", path.display())));
        }
        Ok(Self { name: path.display().to_string(), path })
    }

    /// Create a store at `file_name` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, file_name: impl AsRef<Path>) -> Result<Self> {
        Self::new(dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::InvalidData => ErrorKind::Corrupt(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<String> {
        // `read_to_string` reports non-UTF-8 content as `InvalidData`.
        Ok(fs::read_to_string(&self.path).await.map_err(|e| Self::map_io_error(e, &self.path))?)
    }

    async fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, parent))?;
        }
        Ok(fs::write(&self.path, contents).await.map_err(|e| Self::map_io_error(e, &self.path))?)
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::map_io_error(e, &self.path).into()),
        }
    }
}
