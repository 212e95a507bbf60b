//! Immutable catalog snapshots.

use crate::domain::CatalogRecord;
use crate::search::{prepare, PreparedRecord};

/// The full prepared catalog together with the remote revision it came from.
///
/// Every record in a snapshot was prepared from the same fetch. Snapshots are
/// never edited; the store swaps in a whole new one behind an `Arc` so that a
/// search already holding the old snapshot keeps a consistent view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    records: Vec<PreparedRecord>,
    revision: Option<String>,
}

impl CatalogSnapshot {
    /// Prepares `records` and tags them with `revision`.
    ///
    /// `revision` is `None` when the catalog was fetched before any remote
    /// revision was known, or came from a legacy cache entry without one.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::{CatalogRecord, CatalogSnapshot};
    ///
    /// let snapshot = CatalogSnapshot::new(
    ///     vec![CatalogRecord::new("1", "ลมหายใจ", "Bodyslam", "https://example.com/1")],
    ///     Some("abc123".to_string()),
    /// );
    /// assert_eq!(snapshot.len(), 1);
    /// assert_eq!(snapshot.revision(), Some("abc123"));
    /// ```
    #[must_use]
    pub fn new(records: Vec<CatalogRecord>, revision: Option<String>) -> Self {
        Self {
            records: prepare(records),
            revision,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[PreparedRecord] {
        &self.records
    }

    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clones the raw records back out, in catalog order, for persistence.
    #[must_use]
    pub fn raw_records(&self) -> Vec<CatalogRecord> {
        self.records.iter().map(|p| p.record.clone()).collect()
    }
}
