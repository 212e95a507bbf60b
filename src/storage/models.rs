//! Storage record models for the persistence layer.

use serde::{Deserialize, Serialize};

use crate::domain::CatalogRecord;

/// A persisted catalog together with the revision it was fetched at.
///
/// `hash` is optional because the earliest cache entries stored only the
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CachedCatalog {
    pub data: Vec<CatalogRecord>,
    #[serde(default)]
    pub hash: Option<String>,
}

impl CachedCatalog {
    /// Creates a cache entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::CatalogRecord;
    /// use chordsource::storage::CachedCatalog;
    ///
    /// let entry = CachedCatalog::new(vec![CatalogRecord::default()], Some("abc".to_string()));
    /// assert_eq!(entry.data.len(), 1);
    /// ```
    #[must_use]
    pub const fn new(data: Vec<CatalogRecord>, hash: Option<String>) -> Self {
        Self { data, hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_entry_without_hash() {
        let entry: CachedCatalog =
            serde_json::from_str(r#"{"data": [{"title": "t", "artist": "a", "url": "u"}]}"#).unwrap();
        assert_eq!(entry.hash, None);
        assert_eq!(entry.data[0].url, "u");
    }
}
