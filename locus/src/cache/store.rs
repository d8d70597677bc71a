//! On-disk blob store.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::key::CacheKey;

/// Extension of persisted blobs.
const BLOB_EXTENSION: &str = "bin";

/// Errors from cache persistence.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write cache entry {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize cache entry {key}: {reason}")]
    Serialize { key: String, reason: String },

    #[error("Failed to read cache directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("Failed to remove cache entry {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// Entry count and size of a cache directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: u64,
}

/// Load-or-fetch store of bincode blobs in one directory.
///
/// Entries never expire. Stale data is removed with [`CacheStore::clear`] or
/// by deleting files by hand.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob for `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Returns the cached value for `key`, or `None` on a miss.
    ///
    /// A blob that cannot be read or decoded is reported and treated as a
    /// miss.
    pub fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "Unreadable cache entry, refetching"
                );
                return None;
            }
        };

        match bincode::deserialize_from(BufReader::new(file)) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "Corrupt cache entry, refetching"
                );
                None
            }
        }
    }

    /// Persists `value` under `key`.
    ///
    /// The blob is written to a temporary file in the cache directory and
    /// renamed into place, so readers never see a partial entry.
    pub fn store<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let bytes = bincode::serialize(value).map_err(|e| CacheError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key.file_name(), std::process::id()));
        let write = || -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            writer.write_all(&bytes)?;
            writer.flush()?;
            fs::rename(&temp_path, &path)
        };
        if let Err(source) = write() {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::Write { path, source });
        }

        debug!(key = %key, bytes = bytes.len(), "Cache entry written");
        Ok(())
    }

    /// Returns the cached value for `key`, or runs `fetch`, persists its
    /// result and returns it.
    ///
    /// A failed `fetch` is returned unchanged and nothing is written.
    pub fn load_or_fetch<T, E, F>(&self, key: &CacheKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.load(key) {
            debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        debug!(key = %key, "Cache miss");
        let value = fetch()?;
        self.store(key, &value)?;
        Ok(value)
    }

    /// Counts entries and their total size. A missing directory is empty.
    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut stats = CacheStats::default();
        for path in self.entries()? {
            stats.entries += 1;
            stats.bytes += fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        }
        Ok(stats)
    }

    /// Removes every entry and returns how many were removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = self.entries()?;
        for path in &entries {
            fs::remove_file(path).map_err(|source| CacheError::Remove {
                path: path.clone(),
                source,
            })?;
        }
        Ok(entries.len())
    }

    fn entries(&self) -> Result<Vec<PathBuf>, CacheError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CacheError::ReadDir {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| CacheError::ReadDir {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == BLOB_EXTENSION) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
