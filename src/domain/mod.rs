//! Domain layer for the chordsource engine.
//!
//! This module contains the core domain types, independent of Zellij-specific
//! APIs or infrastructure concerns.
//!
//! # Organization
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`record`]: Catalog record model and record identity
//!
//! # Examples
//!
//! ```
//! use chordsource::domain::{CatalogRecord, Result};
//!
//! fn load_one() -> Result<CatalogRecord> {
//!     Ok(CatalogRecord::new("1", "ลมหายใจ", "Bodyslam", "https://example.com/1"))
//! }
//! ```

pub mod error;
pub mod record;

pub use error::{ChordsourceError, Result};
pub use record::{CatalogRecord, RecordKey};
