//! JSON file-based cache backend.
//!
//! Each key is stored in its own `<key>.json` file inside the cache directory.
//! Writes go to a temporary file first and are renamed into place, so a crash
//! mid-write leaves the previous entry intact.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entry": {
//!     "data": [{"id": "1", "title": "...", "artist": "...", "url": "..."}],
//!     "hash": "9f2c"
//!   }
//! }
//! ```

use crate::domain::error::{ChordsourceError, Result};
use crate::storage::backend::PersistentCache;
use crate::storage::models::CachedCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entry: CachedCatalog,
}

/// Borrowing twin of [`CacheFile`] so writes do not clone the catalog.
#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    entry: &'a CachedCatalog,
}

/// JSON file cache backend.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is owned by the single background
/// worker that serializes all cache I/O.
#[derive(Debug)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    /// Opens a cache rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: PathBuf) -> Result<Self> {
        tracing::debug!(dir = ?dir, "initializing JSON cache");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Resolves the file for `key`, rejecting keys that could escape the directory.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ChordsourceError::Config(format!("invalid cache key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn load_from_file(path: &Path) -> Result<CachedCatalog> {
        let contents = std::fs::read(path)
            .map_err(|e| ChordsourceError::CacheRead(format!("failed to read {}: {e}", path.display())))?;
        let file: CacheFile = serde_json::from_slice(&contents)
            .map_err(|e| ChordsourceError::CacheRead(format!("failed to parse JSON: {e}")))?;

        if file.version != FORMAT_VERSION {
            return Err(ChordsourceError::CacheRead(format!(
                "unsupported cache version {}",
                file.version
            )));
        }

        tracing::debug!(
            record_count = file.entry.data.len(),
            hash = ?file.entry.hash,
            "loaded cache entry"
        );
        Ok(file.entry)
    }
}

impl PersistentCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<CachedCatalog>> {
        let _span = tracing::debug_span!("json_cache_get", key = %key).entered();

        let path = self.path_for(key)?;
        if !path.exists() {
            tracing::debug!("cache entry not found");
            return Ok(None);
        }
        Self::load_from_file(&path).map(Some)
    }

    fn set(&mut self, key: &str, value: &CachedCatalog) -> Result<()> {
        let _span = tracing::debug_span!("json_cache_set",
            key = %key,
            record_count = value.data.len()
        ).entered();

        let path = self.path_for(key)?;
        let json = serde_json::to_vec(&CacheFileRef {
            version: FORMAT_VERSION,
            entry: value,
        })
        .map_err(|e| ChordsourceError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!("cache entry saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogRecord;

    fn entry(hash: &str) -> CachedCatalog {
        CachedCatalog::new(
            vec![
                CatalogRecord::new("1", "รักเธอ", "A", "https://example.com/1"),
                CatalogRecord::new("", "Legacy", "B", "https://example.com/2"),
            ],
            Some(hash.to_string()),
        )
    }

    #[test]
    fn missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::new(dir.path().to_path_buf()).unwrap();
        assert!(cache.get("chordsource").unwrap().is_none());
    }

    #[test]
    fn set_then_get_returns_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = JsonFileCache::new(dir.path().join("nested")).unwrap();
        cache.set("chordsource", &entry("a")).unwrap();
        cache.set("chordsource", &entry("b")).unwrap();

        let loaded = cache.get("chordsource").unwrap().unwrap();
        assert_eq!(loaded, entry("b"));
        assert!(!dir.path().join("nested/chordsource.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_cache_read_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chordsource.json"), b"{not json").unwrap();
        let cache = JsonFileCache::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(cache.get("chordsource"), Err(ChordsourceError::CacheRead(_))));
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = JsonFileCache::new(dir.path().to_path_buf()).unwrap();
        assert!(cache.set("../escape", &entry("a")).is_err());
        assert!(cache.get("").is_err());
    }
}
