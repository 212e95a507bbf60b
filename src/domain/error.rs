//! Error types for the chordsource engine.
//!
//! This module defines the centralized error type [`ChordsourceError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! None of these errors are fatal. The application layer recovers from every
//! variant by keeping the last published catalog snapshot, so the query path
//! never observes a failure.

use thiserror::Error;

/// The main error type for chordsource operations.
///
/// The first three variants form the recoverable taxonomy of the sync engine:
/// transient fetch failures, malformed remote responses, and unreadable caches.
/// The remaining variants cover infrastructure concerns.
///
/// # Examples
///
/// ```
/// use chordsource::ChordsourceError;
///
/// let err = ChordsourceError::TransientFetch("HTTP 503".to_string());
/// assert!(err.is_transient());
///
/// let err = ChordsourceError::MalformedResponse("missing hash".to_string());
/// assert!(!err.is_transient());
/// ```
#[derive(Debug, Error)]
pub enum ChordsourceError {
    /// A revision or catalog request failed at the network or HTTP level.
    ///
    /// Retry later. The last-good snapshot stays published.
    #[error("Transient fetch error: {0}")]
    TransientFetch(String),

    /// A remote response could not be interpreted.
    ///
    /// Raised for non-JSON bodies, a revision body without a string `hash`,
    /// or a catalog body that is not a JSON array. The snapshot is unchanged.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The persistent cache is unavailable or holds corrupt data.
    ///
    /// The store degrades to the empty state and a full remote fetch follows.
    #[error("Cache read error: {0}")]
    CacheRead(String),

    /// Writing to the persistent cache failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Communication with the background cache worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChordsourceError {
    /// Returns `true` when retrying the same operation later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::TransientFetch(_) | Self::Io(_) | Self::Worker(_))
    }
}

/// A specialized `Result` type for chordsource operations.
pub type Result<T> = std::result::Result<T, ChordsourceError>;
