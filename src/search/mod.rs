//! Search over the prepared catalog.
//!
//! # Modules
//!
//! - [`remap`]: Keyboard layout transliteration
//! - [`prepare`](mod@prepare): Per-record search index construction
//! - [`query`]: Dual-variant fuzzy matching, merge and fallback hit
//! - [`selection`]: Circular keyboard selection over results

pub mod prepare;
pub mod query;
pub mod remap;
pub mod selection;

pub use prepare::{prepare, PreparedRecord, SearchIndex};
pub use query::{
    HitKind, ListId, QueryEngine, RankedResultList, SearchHit, WebSearch, DEFAULT_RESULT_LIMIT,
    DEFAULT_WEB_SEARCH_SUFFIX, DEFAULT_WEB_SEARCH_URL, FALLBACK_SCORE,
};
pub use remap::{remap, KeyboardLayout, KeyboardRemapper};
pub use selection::SelectionController;
