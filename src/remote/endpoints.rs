//! Catalog and revision URL construction.

/// Default location of the catalog JSON array.
pub const DEFAULT_CATALOG_URL: &str = "https://db.chord.source.in.th/data.json";

/// Default location of the revision metadata document.
pub const DEFAULT_METADATA_URL: &str = "https://db.chord.source.in.th/metadata.json";

/// The two read-only endpoints the engine talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub catalog_url: String,
    pub metadata_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// URL of the revision document for `token`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::remote::Endpoints;
    ///
    /// let endpoints = Endpoints::default();
    /// assert_eq!(
    ///     endpoints.revision_url("5666667"),
    ///     "https://db.chord.source.in.th/metadata.json?rev=5666667"
    /// );
    /// ```
    #[must_use]
    pub fn revision_url(&self, token: &str) -> String {
        with_rev(&self.metadata_url, token)
    }

    /// URL of the catalog for `token`.
    #[must_use]
    pub fn catalog_url(&self, token: &str) -> String {
        with_rev(&self.catalog_url, token)
    }
}

fn with_rev(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}rev={}", urlencoding::encode(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_encoded() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.catalog_url("a b/c"),
            "https://db.chord.source.in.th/data.json?rev=a%20b%2Fc"
        );
    }

    #[test]
    fn existing_query_string_is_extended() {
        let endpoints = Endpoints {
            catalog_url: "https://cdn.example.com/data.json?v=2".into(),
            metadata_url: "https://cdn.example.com/meta.json".into(),
        };
        assert_eq!(endpoints.catalog_url("x"), "https://cdn.example.com/data.json?v=2&rev=x");
    }
}
