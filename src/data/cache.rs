use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;

use super::loader::{self, LoaderError};
use super::model::TransactionSet;

// ---------------------------------------------------------------------------
// File signature – cheap change detection
// ---------------------------------------------------------------------------

/// Identity of the bytes behind a path: length plus modification time.
/// A cached parse is only reused while the signature matches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileSignature {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileSignature {
    fn probe(path: &Path) -> Result<Self, LoaderError> {
        let meta = std::fs::metadata(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(FileSignature {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// DatasetCache – memoized loads
// ---------------------------------------------------------------------------

struct CacheEntry {
    signature: FileSignature,
    dataset: Arc<TransactionSet>,
}

/// Memoizes [`loader::load_file`] per path.
///
/// Entries are populated lazily and handed out as `Arc`s, so every consumer
/// shares one read-only parse of the table. A load re-parses when the file
/// signature changed; [`DatasetCache::invalidate`] forces the next load to
/// re-parse regardless.
#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table at `path`, reusing the cached parse when the file is
    /// unchanged.
    pub fn load(&self, path: &Path) -> Result<Arc<TransactionSet>, LoaderError> {
        let signature = FileSignature::probe(path)?;
        let key = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get(&key) {
            if entry.signature == signature {
                log::debug!("{}: serving cached table", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::debug!("{}: file changed, re-parsing", path.display());
        }

        let dataset = Arc::new(loader::load_file(path)?);
        entries.insert(
            key,
            CacheEntry {
                signature,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Drop the cached parse for `path`; the next [`DatasetCache::load`]
    /// re-reads the file.
    pub fn invalidate(&self, path: &Path) {
        let key = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&key);
    }
}

/// The process-wide cache instance.
pub fn shared() -> &'static DatasetCache {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new)
}
