//! Local catalog ownership and freshness.
//!
//! # Modules
//!
//! - [`snapshot`]: Immutable prepared catalog tagged with its revision
//! - [`store`]: Publishes snapshots and tracks Empty/CacheLoaded/Fresh
//! - [`sync`]: Revision check and refetch step machine
//! - [`revision`]: Time-bucketed cache-busting tokens
//!
//! # Example
//!
//! ```
//! use chordsource::catalog::{CatalogState, CatalogStore};
//! use chordsource::storage::CachedCatalog;
//! use chordsource::CatalogRecord;
//!
//! let mut store = CatalogStore::new();
//! let entry = CachedCatalog::new(
//!     vec![CatalogRecord::new("1", "คิดถึง", "Palmy", "https://example.com/1")],
//!     Some("abc".to_string()),
//! );
//! store.load_cached(Ok(Some(entry)));
//! assert_eq!(store.state(), CatalogState::CacheLoaded);
//! ```

pub mod revision;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use revision::unknown_revision_token;
pub use snapshot::CatalogSnapshot;
pub use store::{CatalogState, CatalogStore, FetchTicket};
pub use sync::{FreshnessSync, SyncStep};
