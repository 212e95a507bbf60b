//! Chordsource: offline-first chord sheet search for Zellij.
//!
//! Chordsource keeps a local copy of a remote chord sheet catalog and lets
//! the user fuzzy-search it by title or artist:
//! - Queries typed on the wrong keyboard layout still match (`l;ylfu` finds `สวัสดี`)
//! - Results from the literal and remapped query are merged and ranked
//! - A web search for the raw query is always offered as the last hit
//! - The cached catalog is usable immediately and refreshed in the background
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling and action dispatching            │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Catalog       │   │ Worker        │
//! │ (search/)     │   │ (catalog/)    │   │ (worker/)     │
//! │ - Remapping   │   │ - Snapshots   │   │ - Cache I/O   │
//! │ - Ranking     │   │ - Freshness   │   │ - IPC bridge  │
//! │ - Selection   │   │   sync        │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Remote (remote/), Storage (storage/), UI (ui/)     │
//! │  Domain (domain/), Infrastructure (infrastructure/) │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/chordsource.wasm" {
//!         catalog_url "https://db.chord.source.in.th/data.json"
//!         metadata_url "https://db.chord.source.in.th/metadata.json"
//!         result_limit "50"
//!         typed_layout "us-qwerty"
//!         intended_layout "thai-kedmanee"
//!         web_search_url "https://www.google.com/search?q="
//!         open_command "xdg-open"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Startup Flow
//!
//! 1. The plugin requests permissions and asks the worker for the cached catalog.
//! 2. The cached catalog, if any, is published and searchable at once.
//! 3. A freshness check fetches the remote revision and, only when it differs,
//!    the full catalog, which replaces the snapshot and is written back to the cache.
//!
//! # Example
//!
//! ```rust
//! use chordsource::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for c in "yellow".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//! // Nothing is loaded yet, so only the web search is offered.
//! assert_eq!(state.results().len(), 1);
//! # Ok::<(), chordsource::ChordsourceError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod remote;
pub mod search;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event};
pub use catalog::CatalogSnapshot;
pub use domain::{CatalogRecord, ChordsourceError, RecordKey, Result};
pub use ui::Theme;

use remote::endpoints::{DEFAULT_CATALOG_URL, DEFAULT_METADATA_URL};
use remote::Endpoints;
use search::{
    KeyboardLayout, KeyboardRemapper, QueryEngine, WebSearch, DEFAULT_RESULT_LIMIT,
    DEFAULT_WEB_SEARCH_SUFFIX, DEFAULT_WEB_SEARCH_URL,
};
use std::collections::BTreeMap;

/// Cache entry name used when none is configured.
pub const DEFAULT_CACHE_KEY: &str = "chordsource";

/// Command used to open chord sheets when none is configured.
pub const DEFAULT_OPEN_COMMAND: &str = "xdg-open";

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL of the catalog JSON array.
    pub catalog_url: String,

    /// URL of the revision metadata document.
    pub metadata_url: String,

    /// Maximum matches kept per query variant. Default: 50
    pub result_limit: usize,

    /// Layout the user's keyboard is physically set to.
    pub typed_layout: KeyboardLayout,

    /// Layout the user meant to type in.
    pub intended_layout: KeyboardLayout,

    /// Web search prefix or `{query}` template for the fallback hit.
    pub web_search_url: String,

    /// Appended to the query before it is sent to the web search.
    pub web_search_suffix: String,

    /// Program that opens a URL, run through Zellij's `run_command`.
    pub open_command: String,

    /// Name of the persisted catalog entry.
    pub cache_key: String,

    /// Tracing filter directive. Default: `"info"`
    pub trace_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let remapper = KeyboardRemapper::default();
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            typed_layout: remapper.source(),
            intended_layout: remapper.target(),
            web_search_url: DEFAULT_WEB_SEARCH_URL.to_string(),
            web_search_suffix: DEFAULT_WEB_SEARCH_SUFFIX.to_string(),
            open_command: DEFAULT_OPEN_COMMAND.to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            trace_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Missing or unparsable values fall back to their defaults. An unknown
    /// layout name resets both layouts to the default pair.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use chordsource::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("result_limit".to_string(), "20".to_string());
    /// map.insert("open_command".to_string(), "open".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.result_limit, 20);
    /// assert_eq!(config.open_command, "open");
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        Self::parse(config).0
    }

    /// Like [`Config::from_zellij`], also returning the problems that made a
    /// value fall back to its default.
    ///
    /// Nothing is logged here; the caller reports the problems once tracing
    /// is installed.
    #[must_use]
    pub fn parse(config: &BTreeMap<String, String>) -> (Self, Vec<ChordsourceError>) {
        let mut problems = Vec::new();
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map_or(default, str::to_string)
        };

        let result_limit = config
            .get("result_limit")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.result_limit);

        let (typed_layout, intended_layout) = Self::parse_layouts(config)
            .unwrap_or_else(|e| {
                problems.push(e);
                (defaults.typed_layout, defaults.intended_layout)
            });

        let parsed = Self {
            catalog_url: text("catalog_url", defaults.catalog_url),
            metadata_url: text("metadata_url", defaults.metadata_url),
            result_limit,
            typed_layout,
            intended_layout,
            web_search_url: text("web_search_url", defaults.web_search_url),
            web_search_suffix: config
                .get("web_search_suffix")
                .cloned()
                .unwrap_or(defaults.web_search_suffix),
            open_command: text("open_command", defaults.open_command),
            cache_key: text("cache_key", defaults.cache_key),
            trace_level: text("trace_level", defaults.trace_level),
        };
        (parsed, problems)
    }

    fn parse_layouts(config: &BTreeMap<String, String>) -> Result<(KeyboardLayout, KeyboardLayout)> {
        let defaults = KeyboardRemapper::default();
        let typed = config
            .get("typed_layout")
            .map_or(Ok(defaults.source()), |s| s.trim().parse())?;
        let intended = config
            .get("intended_layout")
            .map_or(Ok(defaults.target()), |s| s.trim().parse())?;
        Ok((typed, intended))
    }

    /// Remote endpoints described by this configuration.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            catalog_url: self.catalog_url.clone(),
            metadata_url: self.metadata_url.clone(),
        }
    }

    /// Query engine described by this configuration.
    #[must_use]
    pub fn query_engine(&self) -> QueryEngine {
        QueryEngine::new(
            KeyboardRemapper::new(self.typed_layout, self.intended_layout),
            self.result_limit,
            WebSearch::new(self.web_search_url.clone(), self.web_search_suffix.clone()),
        )
    }
}

/// Creates the application state for `config`.
///
/// The catalog starts empty; the plugin runtime fills it from the cache
/// worker and the first freshness check.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        catalog_url = %config.catalog_url,
        result_limit = config.result_limit,
        typed_layout = config.typed_layout.name(),
        intended_layout = config.intended_layout.name(),
        "initializing chordsource plugin"
    );
    AppState::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = Config::from_zellij(&map(&[("result_limit", "lots")]));
        assert_eq!(config.result_limit, DEFAULT_RESULT_LIMIT);
        let config = Config::from_zellij(&map(&[("result_limit", "0")]));
        assert_eq!(config.result_limit, DEFAULT_RESULT_LIMIT);
    }

    #[test]
    fn unknown_layout_resets_both() {
        let config = Config::from_zellij(&map(&[
            ("typed_layout", "thai-kedmanee"),
            ("intended_layout", "dvorak"),
        ]));
        assert_eq!(config.typed_layout, KeyboardLayout::UsQwerty);
        assert_eq!(config.intended_layout, KeyboardLayout::ThaiKedmanee);
    }

    #[test]
    fn unknown_layout_is_reported_to_the_caller() {
        let (config, problems) = Config::parse(&map(&[("typed_layout", "dvorak")]));
        assert_eq!(config, Config::default());
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], ChordsourceError::Config(_)));

        let (_, problems) = Config::parse(&map(&[("result_limit", "20")]));
        assert!(problems.is_empty());
    }

    #[test]
    fn reversed_layouts_are_accepted() {
        let config = Config::from_zellij(&map(&[
            ("typed_layout", "thai-kedmanee"),
            ("intended_layout", "us-qwerty"),
        ]));
        assert_eq!(config.typed_layout, KeyboardLayout::ThaiKedmanee);
        assert_eq!(config.intended_layout, KeyboardLayout::UsQwerty);
    }

    #[test]
    fn endpoints_follow_urls() {
        let config = Config::from_zellij(&map(&[("catalog_url", " https://mirror.example/data.json ")]));
        assert_eq!(config.endpoints().catalog_url, "https://mirror.example/data.json");
        assert_eq!(config.endpoints().metadata_url, DEFAULT_METADATA_URL);
    }
}
