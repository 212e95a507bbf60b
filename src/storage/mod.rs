//! Storage layer for the locally cached catalog.
//!
//! # Modules
//!
//! - `backend`: [`PersistentCache`] trait implemented by cache backends
//! - `json`: JSON file-based cache with atomic writes
//! - `models`: Persisted catalog entry

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PersistentCache;
pub use json::JsonFileCache;
pub use models::CachedCatalog;
