//! Record preparation for fuzzy search.
//!
//! Each catalog record gets a precomputed search key built once per catalog
//! load. The title appears twice in the key so that a query matching the title
//! outranks one matching only the artist.

use crate::domain::CatalogRecord;

/// Precomputed, lower-cased haystack for one record.
///
/// Opaque to callers; the query engine matches against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndex(String);

impl SearchIndex {
    /// Builds the index text `title artist title`.
    fn build(record: &CatalogRecord) -> Self {
        let text = format!("{} {} {}", record.title, record.artist, record.title);
        Self(text.to_lowercase())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// A catalog record paired with its search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRecord {
    pub record: CatalogRecord,
    index: SearchIndex,
}

impl PreparedRecord {
    #[must_use]
    pub fn new(record: CatalogRecord) -> Self {
        let index = SearchIndex::build(&record);
        Self { record, index }
    }

    #[must_use]
    pub const fn index(&self) -> &SearchIndex {
        &self.index
    }
}

/// Prepares raw records for searching.
///
/// Output order matches input order and no record is dropped. Records with a
/// missing title or artist are indexed with the empty string in its place; a
/// single warning reports how many were seen.
///
/// # Examples
///
/// ```
/// use chordsource::CatalogRecord;
/// use chordsource::search::prepare;
///
/// let prepared = prepare(vec![
///     CatalogRecord::new("1", "Yellow", "Coldplay", "https://example.com/1"),
///     CatalogRecord::new("2", "", "", "https://example.com/2"),
/// ]);
/// assert_eq!(prepared.len(), 2);
/// assert_eq!(prepared[0].record.id, "1");
/// ```
#[must_use]
pub fn prepare(records: Vec<CatalogRecord>) -> Vec<PreparedRecord> {
    let _span = tracing::debug_span!("prepare_records", record_count = records.len()).entered();

    let incomplete = records.iter().filter(|r| r.is_incomplete()).count();
    if incomplete > 0 {
        tracing::warn!(incomplete, "catalog records with missing title or artist");
    }

    records.into_iter().map(PreparedRecord::new).collect()
}
