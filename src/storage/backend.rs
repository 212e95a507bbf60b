//! Persistent cache abstraction.
//!
//! This module defines the [`PersistentCache`] trait that abstracts over
//! key-value persistence backends. The trait is minimal: the engine only ever
//! reads one catalog entry at startup and writes one after a refresh.

use crate::domain::error::Result;
use crate::storage::models::CachedCatalog;

/// Key-value persistence for cached catalogs.
///
/// # Implementations
///
/// - [`JsonFileCache`](crate::storage::JsonFileCache): one JSON file per key with atomic writes
///
/// # Examples
///
/// ```no_run
/// use chordsource::storage::{JsonFileCache, PersistentCache};
/// use std::path::PathBuf;
///
/// let cache = JsonFileCache::new(PathBuf::from("/tmp/chordsource"))?;
/// let entry = cache.get("chordsource")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PersistentCache: Send {
    /// Reads the entry stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`ChordsourceError::CacheRead`](crate::ChordsourceError::CacheRead)
    /// if the backend is unavailable or the stored entry is corrupt.
    fn get(&self, key: &str) -> Result<Option<CachedCatalog>>;

    /// Replaces the entry stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous entry, if any, must
    /// remain readable in that case.
    fn set(&mut self, key: &str, value: &CachedCatalog) -> Result<()>;
}
