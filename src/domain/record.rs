//! Catalog record domain model.
//!
//! A [`CatalogRecord`] is one chord sheet in the remote catalog: a title, an
//! artist, and the URL of the page that hosts the chords. Records are immutable
//! once fetched; the remote catalog is the source of truth.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One chord sheet from the remote catalog.
///
/// Missing or `null` fields deserialize as empty strings. Legacy catalog
/// entries carry no `id`, so identity falls back to the URL (see [`RecordKey`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub artist: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,
}

impl CatalogRecord {
    /// Creates a record with an explicit identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::CatalogRecord;
    ///
    /// let record = CatalogRecord::new("1", "รักเธอ", "A", "https://example.com/1");
    /// assert_eq!(record.title, "รักเธอ");
    /// ```
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            url: url.into(),
        }
    }

    /// Returns the identity used for de-duplication.
    ///
    /// `id` wins when non-empty; otherwise the URL identifies the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::{CatalogRecord, RecordKey};
    ///
    /// let legacy = CatalogRecord::new("", "t", "a", "https://example.com/x");
    /// assert_eq!(legacy.key(), RecordKey::Url("https://example.com/x".into()));
    /// ```
    #[must_use]
    pub fn key(&self) -> RecordKey {
        if self.id.is_empty() {
            RecordKey::Url(self.url.clone())
        } else {
            RecordKey::Id(self.id.clone())
        }
    }

    /// Returns `true` when the title or artist is missing.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.title.is_empty() || self.artist.is_empty()
    }
}

/// Record identity.
///
/// Kept as an enum so an `id` can never collide with a URL that happens to
/// have the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Id(String),
    Url(String),
    /// Snapshot position of a record with neither id nor url.
    Position(usize),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Url(url) => write!(f, "url:{url}"),
            Self::Position(at) => write!(f, "pos:{at}"),
        }
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_become_empty() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"title": "ใจ", "artist": null, "url": "u"}"#).unwrap();
        assert_eq!(record.id, "");
        assert_eq!(record.artist, "");
        assert!(record.is_incomplete());
    }

    #[test]
    fn key_prefers_id() {
        let record = CatalogRecord::new("42", "t", "a", "https://example.com/42");
        assert_eq!(record.key(), RecordKey::Id("42".into()));
    }

    #[test]
    fn id_and_url_keys_never_collide() {
        let by_id = CatalogRecord::new("same", "t", "a", "other");
        let by_url = CatalogRecord::new("", "t", "a", "same");
        assert_ne!(by_id.key(), by_url.key());
    }
}
