//! Cache-busting revision tokens.

use chrono::{DateTime, Utc};

/// Width of one cache-busting time bucket.
const BUCKET_SECONDS: i64 = 300;

/// Token used in `?rev=` when no remote revision is known.
///
/// The current time floored to five-minute buckets. This only defeats stale
/// CDN caches; it carries no information about catalog content.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use chordsource::catalog::unknown_revision_token;
///
/// let now = Utc.timestamp_opt(1_700_000_123, 0).unwrap();
/// assert_eq!(unknown_revision_token(now), "5666667");
/// ```
#[must_use]
pub fn unknown_revision_token(now: DateTime<Utc>) -> String {
    now.timestamp().div_euclid(BUCKET_SECONDS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn same_bucket_same_token() {
        let a = Utc.timestamp_opt(600, 0).unwrap();
        let b = Utc.timestamp_opt(899, 0).unwrap();
        let c = Utc.timestamp_opt(900, 0).unwrap();
        assert_eq!(unknown_revision_token(a), unknown_revision_token(b));
        assert_ne!(unknown_revision_token(b), unknown_revision_token(c));
    }
}
