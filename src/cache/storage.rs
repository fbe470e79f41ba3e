//! Persistent Store Adapter
//!
//! Path-addressed byte storage behind the memory layer. "Not found" is never
//! an error here: reads return `None` and removes of missing files succeed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;

use crate::error::{CacheError, Result};

/// Byte storage used by the cache engine.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Reads the whole file, or `None` if it does not exist.
    async fn read(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Creates or fully replaces the file.
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Deletes the file; a missing file is not an error.
    async fn remove(&self, path: &Path) -> Result<()>;

    /// Lists entry files (`*.json`) in a directory; a missing directory is empty.
    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Filesystem store backed by `tokio::fs`.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers see either the old or the new contents.
#[derive(Debug, Default)]
pub struct FsStore {
    tmp_counter: AtomicU64,
}

impl FsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

#[async_trait]
impl PersistentStore for FsStore {
    async fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::storage(path, e)),
        }
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::storage(parent, e))?;
        }

        let tmp = self.temp_path(path);
        if let Err(e) = fs::write(&tmp, bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(CacheError::storage(path, e));
        }
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(CacheError::storage(path, e));
        }
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::storage(path, e)),
        }
    }

    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::storage(dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::storage(dir, e))?
        {
            let path = entry.path();
            let is_entry = path.extension().is_some_and(|ext| ext == "json")
                && !entry.file_name().to_string_lossy().starts_with('.');
            if is_entry {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
