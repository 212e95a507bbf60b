//! Remote catalog capability.
//!
//! The engine never performs HTTP itself. It builds request URLs, interprets
//! response bodies, and consumes a [`RemoteSource`] for blocking callers. The
//! Zellij plugin instead issues `web_request` calls and feeds the raw
//! responses back as events; both paths share the parsers in [`response`].
//!
//! # Modules
//!
//! - [`endpoints`]: Catalog and revision URL construction
//! - [`response`]: Status checks and body parsing
//! - [`progress`]: Download progress reporting

pub mod endpoints;
pub mod progress;
pub mod response;

pub use endpoints::Endpoints;
pub use progress::{LoadProgress, LOADING_MESSAGE};
pub use response::{check_status, parse_catalog, parse_revision};

use crate::domain::{CatalogRecord, Result};

/// Blocking access to the remote catalog.
///
/// Implementations map network and HTTP failures to
/// [`ChordsourceError::TransientFetch`](crate::ChordsourceError::TransientFetch)
/// and unusable bodies to
/// [`ChordsourceError::MalformedResponse`](crate::ChordsourceError::MalformedResponse).
pub trait RemoteSource {
    /// Fetches the current remote revision hash.
    ///
    /// `token` is a cache-busting value appended as `?rev=`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body has no `hash`.
    fn fetch_revision(&mut self, token: &str) -> Result<String>;

    /// Fetches the full catalog, reporting progress as bytes arrive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a record array.
    fn fetch_catalog(
        &mut self,
        token: &str,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Vec<CatalogRecord>>;
}
