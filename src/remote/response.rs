//! Response interpretation for the revision and catalog endpoints.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{CatalogRecord, ChordsourceError, Result};

/// Maps an HTTP status to the error taxonomy.
///
/// # Errors
///
/// Returns [`ChordsourceError::TransientFetch`] for any non-2xx status.
pub fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ChordsourceError::TransientFetch(format!("HTTP status {status}")))
    }
}

#[derive(Deserialize)]
struct RevisionDocument {
    hash: Option<Value>,
}

/// Extracts the revision hash from a metadata body `{"hash": "..."}`.
///
/// # Errors
///
/// Returns [`ChordsourceError::MalformedResponse`] when the body is not JSON or
/// `hash` is absent, empty, or not a string.
///
/// # Examples
///
/// ```
/// use chordsource::remote::parse_revision;
///
/// assert_eq!(parse_revision(br#"{"hash": "9f2c"}"#).unwrap(), "9f2c");
/// assert!(parse_revision(br#"{"updated": 1}"#).is_err());
/// ```
pub fn parse_revision(body: &[u8]) -> Result<String> {
    let document: RevisionDocument = serde_json::from_slice(body)
        .map_err(|e| ChordsourceError::MalformedResponse(format!("revision body: {e}")))?;

    match document.hash {
        Some(Value::String(hash)) if !hash.is_empty() => Ok(hash),
        Some(other) => Err(ChordsourceError::MalformedResponse(format!(
            "revision hash is not a non-empty string: {other}"
        ))),
        None => Err(ChordsourceError::MalformedResponse(
            "revision body has no hash".to_string(),
        )),
    }
}

/// Parses a catalog body, which must be a JSON array of records.
///
/// # Errors
///
/// Returns [`ChordsourceError::MalformedResponse`] when the body is not JSON,
/// not an array, or holds an element that is not a record object.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<CatalogRecord>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ChordsourceError::MalformedResponse(format!("catalog body: {e}")))?;

    if !value.is_array() {
        return Err(ChordsourceError::MalformedResponse(
            "catalog body is not an array".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| ChordsourceError::MalformedResponse(format!("catalog record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert!(matches!(check_status(304), Err(ChordsourceError::TransientFetch(_))));
        assert!(matches!(check_status(503), Err(ChordsourceError::TransientFetch(_))));
    }

    #[test]
    fn revision_hash_must_be_string() {
        assert!(matches!(
            parse_revision(br#"{"hash": 12}"#),
            Err(ChordsourceError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_revision(br#"{"hash": ""}"#),
            Err(ChordsourceError::MalformedResponse(_))
        ));
        assert!(matches!(parse_revision(b"<html>"), Err(ChordsourceError::MalformedResponse(_))));
    }

    #[test]
    fn catalog_must_be_array() {
        assert!(matches!(
            parse_catalog(br#"{"data": []}"#),
            Err(ChordsourceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn catalog_tolerates_legacy_and_partial_records() {
        let body = r#"[
            {"title": "ใจเกเร", "artist": "Sek Loso", "url": "https://example.com/a"},
            {"id": "7", "title": "Numb", "url": "https://example.com/b"}
        ]"#;
        let records = parse_catalog(body.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "");
        assert_eq!(records[1].artist, "");
    }
}
