//! Catalog store: the single owner of the published snapshot.
//!
//! The store moves through three states:
//!
//! ```text
//!   Empty ──cache hit──▶ CacheLoaded ──validated/replaced──▶ Fresh ◀─┐
//!     │                                                       │     │
//!     └──────────────── first remote fetch ───────────────────┘─────┘
//! ```
//!
//! Failures never move the store backwards. Remote results are tagged with a
//! [`FetchTicket`]; a result whose ticket is older than the one behind the
//! published snapshot is rejected, so a slow superseded fetch cannot overwrite
//! newer data.

use std::sync::Arc;

use crate::catalog::CatalogSnapshot;
use crate::domain::{ChordsourceError, Result};
use crate::storage::CachedCatalog;

/// Lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    /// No catalog has been published yet.
    Empty,
    /// Published snapshot came from the local cache and is not yet validated.
    CacheLoaded,
    /// Published snapshot matches the latest known remote revision.
    Fresh,
}

/// Monotonic tag for one refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub u64);

/// Owner of the currently published [`CatalogSnapshot`].
#[derive(Debug)]
pub struct CatalogStore {
    snapshot: Arc<CatalogSnapshot>,
    state: CatalogState,
    last_issued: u64,
    published: Option<FetchTicket>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(CatalogSnapshot::empty()),
            state: CatalogState::Empty,
            last_issued: 0,
            published: None,
        }
    }

    /// Returns the published snapshot.
    ///
    /// Callers hold the `Arc` for as long as they need a consistent view; a
    /// later replacement does not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.snapshot)
    }

    #[must_use]
    pub const fn state(&self) -> CatalogState {
        self.state
    }

    /// Revision of the published snapshot, if known.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.snapshot.revision()
    }

    #[must_use]
    pub fn has_catalog(&self) -> bool {
        self.state != CatalogState::Empty
    }

    /// Applies the result of reading the persistent cache.
    ///
    /// Only an empty store accepts cached data: once anything has been
    /// published, the cache can only be older. A read error degrades to the
    /// empty state, which makes the next refresh a full remote fetch.
    ///
    /// Returns `true` when a snapshot was published.
    pub fn load_cached(&mut self, cached: Result<Option<CachedCatalog>>) -> bool {
        let _span = tracing::debug_span!("catalog_load_cached", state = ?self.state).entered();

        if self.state != CatalogState::Empty {
            tracing::debug!("ignoring cache read, catalog already published");
            return false;
        }

        match cached {
            Ok(Some(entry)) => {
                let snapshot = CatalogSnapshot::new(entry.data, entry.hash);
                tracing::debug!(
                    record_count = snapshot.len(),
                    revision = ?snapshot.revision(),
                    "catalog loaded from cache"
                );
                self.snapshot = Arc::new(snapshot);
                self.state = CatalogState::CacheLoaded;
                true
            }
            Ok(None) => {
                tracing::debug!("no cached catalog");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache unreadable, treating catalog as empty");
                false
            }
        }
    }

    /// Issues the ticket for a new refresh attempt.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.last_issued += 1;
        FetchTicket(self.last_issued)
    }

    fn is_superseded(&self, ticket: FetchTicket) -> bool {
        self.published.is_some_and(|published| ticket <= published)
    }

    /// Marks the published snapshot as validated against the remote revision.
    pub fn confirm(&mut self, ticket: FetchTicket) {
        if self.is_superseded(ticket) || self.state == CatalogState::Empty {
            tracing::debug!(ticket = ticket.0, state = ?self.state, "ignoring confirmation");
            return;
        }
        tracing::debug!(ticket = ticket.0, revision = ?self.revision(), "catalog confirmed fresh");
        self.published = Some(ticket);
        self.state = CatalogState::Fresh;
    }

    /// Atomically replaces the published snapshot.
    ///
    /// Returns `false` without touching anything when `ticket` is not newer
    /// than the ticket of the published snapshot.
    pub fn commit(&mut self, ticket: FetchTicket, snapshot: CatalogSnapshot) -> bool {
        if self.is_superseded(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                published = ?self.published.map(|t| t.0),
                "rejecting superseded catalog"
            );
            return false;
        }

        tracing::debug!(
            ticket = ticket.0,
            record_count = snapshot.len(),
            revision = ?snapshot.revision(),
            "publishing catalog snapshot"
        );
        self.snapshot = Arc::new(snapshot);
        self.published = Some(ticket);
        self.state = CatalogState::Fresh;
        true
    }

    /// Records a failed refresh. The state and snapshot are left as they are.
    pub fn fail(&self, ticket: FetchTicket, error: &ChordsourceError) {
        tracing::warn!(
            ticket = ticket.0,
            error = %error,
            transient = error.is_transient(),
            state = ?self.state,
            "catalog refresh failed, keeping current snapshot"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogRecord;

    fn records(n: usize) -> Vec<CatalogRecord> {
        (0..n)
            .map(|i| CatalogRecord::new(i.to_string(), format!("song {i}"), "artist", "u"))
            .collect()
    }

    fn cached(n: usize, hash: &str) -> CachedCatalog {
        CachedCatalog {
            data: records(n),
            hash: Some(hash.to_string()),
        }
    }

    #[test]
    fn cache_hit_moves_to_cache_loaded() {
        let mut store = CatalogStore::new();
        assert!(store.load_cached(Ok(Some(cached(3, "a")))));
        assert_eq!(store.state(), CatalogState::CacheLoaded);
        assert_eq!(store.snapshot().len(), 3);
        assert_eq!(store.revision(), Some("a"));
    }

    #[test]
    fn cache_error_stays_empty() {
        let mut store = CatalogStore::new();
        assert!(!store.load_cached(Err(ChordsourceError::CacheRead("corrupt".into()))));
        assert_eq!(store.state(), CatalogState::Empty);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn late_cache_read_does_not_overwrite_fresh_data() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_refresh();
        assert!(store.commit(ticket, CatalogSnapshot::new(records(5), Some("b".into()))));
        assert!(!store.load_cached(Ok(Some(cached(1, "a")))));
        assert_eq!(store.revision(), Some("b"));
    }

    #[test]
    fn confirm_marks_cache_fresh() {
        let mut store = CatalogStore::new();
        store.load_cached(Ok(Some(cached(2, "a"))));
        let before = store.snapshot();
        let ticket = store.begin_refresh();
        store.confirm(ticket);
        assert_eq!(store.state(), CatalogState::Fresh);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn superseded_commit_is_rejected() {
        let mut store = CatalogStore::new();
        let older = store.begin_refresh();
        let newer = store.begin_refresh();
        assert!(store.commit(newer, CatalogSnapshot::new(records(2), Some("new".into()))));
        assert!(!store.commit(older, CatalogSnapshot::new(records(9), Some("old".into()))));
        assert_eq!(store.revision(), Some("new"));
        assert!(!store.commit(newer, CatalogSnapshot::new(records(9), Some("again".into()))));
    }

    #[test]
    fn failure_keeps_state() {
        let mut store = CatalogStore::new();
        store.load_cached(Ok(Some(cached(4, "a"))));
        let ticket = store.begin_refresh();
        store.fail(ticket, &ChordsourceError::TransientFetch("offline".into()));
        assert_eq!(store.state(), CatalogState::CacheLoaded);
        assert_eq!(store.snapshot().len(), 4);
    }

    #[test]
    fn readers_keep_their_snapshot_across_replacement() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_refresh();
        store.commit(ticket, CatalogSnapshot::new(records(1), Some("a".into())));
        let held = store.snapshot();
        let ticket = store.begin_refresh();
        store.commit(ticket, CatalogSnapshot::new(records(7), Some("b".into())));
        assert_eq!(held.len(), 1);
        assert_eq!(store.snapshot().len(), 7);
    }
}
