//! Freshness reconciliation between the cached catalog and the remote one.
//!
//! [`FreshnessSync`] is a small step machine with no I/O of its own. Callers
//! start a refresh with [`FreshnessSync::begin`], perform the request each
//! [`SyncStep`] asks for, and feed the outcome back. The event-driven plugin
//! does this across `web_request` round trips; [`FreshnessSync::reconcile`]
//! does it in one blocking call over a [`RemoteSource`] and a
//! [`PersistentCache`].
//!
//! ```text
//! begin ─▶ FetchRevision ─on_revision─▶ UpToDate
//!                               └──────▶ FetchCatalog ─on_catalog─▶ Replace
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::{unknown_revision_token, CatalogSnapshot, CatalogStore, FetchTicket};
use crate::domain::{CatalogRecord, ChordsourceError, Result};
use crate::remote::{LoadProgress, RemoteSource};
use crate::storage::{CachedCatalog, PersistentCache};

/// What the caller must do next for a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    /// Fetch the remote revision with `token` as the cache buster.
    FetchRevision { ticket: FetchTicket, token: String },
    /// Fetch the full catalog with `token` as the cache buster.
    FetchCatalog { ticket: FetchTicket, token: String },
    /// The published snapshot already matches the remote revision.
    UpToDate { ticket: FetchTicket },
    /// A new snapshot is ready to be committed and persisted.
    Replace {
        ticket: FetchTicket,
        snapshot: CatalogSnapshot,
        entry: CachedCatalog,
    },
    /// The response belongs to a refresh that is no longer in flight.
    Stale { ticket: FetchTicket },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingRevision {
        ticket: FetchTicket,
        cached_revision: Option<String>,
        has_snapshot: bool,
    },
    AwaitingCatalog {
        ticket: FetchTicket,
        revision: Option<String>,
    },
}

/// Background reconciliation state.
#[derive(Debug, Clone)]
pub struct FreshnessSync {
    phase: Phase,
}

impl Default for FreshnessSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FreshnessSync {
    #[must_use]
    pub const fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Returns `true` while a refresh is waiting on a response.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Starts a refresh, superseding any refresh already in flight.
    ///
    /// The revision document is always requested with a time-bucketed token:
    /// it is the thing that tells us whether anything changed, so it must not
    /// be served from a stale CDN cache.
    pub fn begin(
        &mut self,
        ticket: FetchTicket,
        cached_revision: Option<String>,
        has_snapshot: bool,
        now: DateTime<Utc>,
    ) -> SyncStep {
        tracing::debug!(
            ticket = ticket.0,
            cached_revision = ?cached_revision,
            has_snapshot,
            "starting freshness check"
        );
        self.phase = Phase::AwaitingRevision {
            ticket,
            cached_revision,
            has_snapshot,
        };
        SyncStep::FetchRevision {
            ticket,
            token: unknown_revision_token(now),
        }
    }

    /// Feeds the result of the revision request.
    ///
    /// A changed or previously unknown revision asks for the catalog. When the
    /// revision request fails and nothing is published yet, the catalog is
    /// fetched anyway under a time-bucketed token; with a published snapshot
    /// the failure is returned and the snapshot stays in use.
    ///
    /// # Errors
    ///
    /// Returns the revision error when a snapshot is already published.
    pub fn on_revision(
        &mut self,
        ticket: FetchTicket,
        result: Result<String>,
        now: DateTime<Utc>,
    ) -> Result<SyncStep> {
        let Phase::AwaitingRevision {
            ticket: expected,
            cached_revision,
            has_snapshot,
        } = &self.phase
        else {
            return Ok(SyncStep::Stale { ticket });
        };
        if *expected != ticket {
            return Ok(SyncStep::Stale { ticket });
        }
        let cached_revision = cached_revision.clone();
        let has_snapshot = *has_snapshot;

        match result {
            Ok(remote) if has_snapshot && cached_revision.as_deref() == Some(remote.as_str()) => {
                tracing::debug!(ticket = ticket.0, revision = %remote, "catalog is up to date");
                self.phase = Phase::Idle;
                Ok(SyncStep::UpToDate { ticket })
            }
            Ok(remote) => {
                tracing::debug!(
                    ticket = ticket.0,
                    cached = ?cached_revision,
                    remote = %remote,
                    "remote revision differs, fetching catalog"
                );
                self.phase = Phase::AwaitingCatalog {
                    ticket,
                    revision: Some(remote.clone()),
                };
                Ok(SyncStep::FetchCatalog {
                    ticket,
                    token: remote,
                })
            }
            Err(e) if !has_snapshot => {
                tracing::warn!(
                    ticket = ticket.0,
                    error = %e,
                    "revision unavailable with no catalog, fetching catalog directly"
                );
                self.phase = Phase::AwaitingCatalog {
                    ticket,
                    revision: None,
                };
                Ok(SyncStep::FetchCatalog {
                    ticket,
                    token: unknown_revision_token(now),
                })
            }
            Err(e) => {
                self.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    /// Feeds the result of the catalog request.
    ///
    /// # Errors
    ///
    /// Returns the catalog error; the caller keeps its current snapshot.
    pub fn on_catalog(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<CatalogRecord>>,
    ) -> Result<SyncStep> {
        let Phase::AwaitingCatalog {
            ticket: expected,
            revision,
        } = &self.phase
        else {
            return Ok(SyncStep::Stale { ticket });
        };
        if *expected != ticket {
            return Ok(SyncStep::Stale { ticket });
        }
        let revision = revision.clone();
        self.phase = Phase::Idle;

        let records = result?;
        tracing::debug!(
            ticket = ticket.0,
            record_count = records.len(),
            revision = ?revision,
            "catalog fetched"
        );
        let snapshot = CatalogSnapshot::new(records.clone(), revision.clone());
        Ok(SyncStep::Replace {
            ticket,
            snapshot,
            entry: CachedCatalog::new(records, revision),
        })
    }

    /// Runs one complete refresh against blocking collaborators.
    ///
    /// Returns the snapshot published afterwards: the same `Arc` when nothing
    /// changed, a new one when the remote revision moved. A failed cache write
    /// is logged and does not undo the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns transient or malformed-response errors from the remote. The
    /// store keeps its current snapshot in that case.
    pub fn reconcile<R, C>(
        &mut self,
        store: &mut CatalogStore,
        remote: &mut R,
        cache: &mut C,
        cache_key: &str,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Arc<CatalogSnapshot>>
    where
        R: RemoteSource + ?Sized,
        C: PersistentCache + ?Sized,
    {
        let _span = tracing::debug_span!("freshness_reconcile", cache_key = %cache_key).entered();

        let ticket = store.begin_refresh();
        let mut step = self.begin(
            ticket,
            store.revision().map(str::to_owned),
            store.has_catalog(),
            Utc::now(),
        );

        loop {
            step = match step {
                SyncStep::FetchRevision { ticket, token } => {
                    let fetched = remote.fetch_revision(&token);
                    self.on_revision(ticket, fetched, Utc::now()).map_err(|e| {
                        store.fail(ticket, &e);
                        e
                    })?
                }
                SyncStep::FetchCatalog { ticket, token } => {
                    let fetched = remote.fetch_catalog(&token, &mut *progress);
                    self.on_catalog(ticket, fetched).map_err(|e| {
                        store.fail(ticket, &e);
                        e
                    })?
                }
                SyncStep::UpToDate { ticket } => {
                    store.confirm(ticket);
                    return Ok(store.snapshot());
                }
                SyncStep::Replace {
                    ticket,
                    snapshot,
                    entry,
                } => {
                    if store.commit(ticket, snapshot) {
                        if let Err(e) = cache.set(cache_key, &entry) {
                            tracing::warn!(error = %e, "failed to persist refreshed catalog");
                        }
                    }
                    return Ok(store.snapshot());
                }
                SyncStep::Stale { ticket } => {
                    return Err(ChordsourceError::Worker(format!(
                        "refresh {} was superseded",
                        ticket.0
                    )));
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<CatalogRecord> {
        (0..n)
            .map(|i| CatalogRecord::new(i.to_string(), format!("song {i}"), "artist", "u"))
            .collect()
    }

    #[test]
    fn unchanged_revision_is_up_to_date() {
        let mut sync = FreshnessSync::new();
        let ticket = FetchTicket(1);
        sync.begin(ticket, Some("a".into()), true, Utc::now());
        let step = sync.on_revision(ticket, Ok("a".into()), Utc::now()).unwrap();
        assert_eq!(step, SyncStep::UpToDate { ticket });
        assert!(!sync.in_flight());
    }

    #[test]
    fn changed_revision_fetches_catalog_by_hash() {
        let mut sync = FreshnessSync::new();
        let ticket = FetchTicket(1);
        sync.begin(ticket, Some("a".into()), true, Utc::now());
        let step = sync.on_revision(ticket, Ok("b".into()), Utc::now()).unwrap();
        assert_eq!(
            step,
            SyncStep::FetchCatalog {
                ticket,
                token: "b".into()
            }
        );

        let SyncStep::Replace { snapshot, entry, .. } =
            sync.on_catalog(ticket, Ok(records(3))).unwrap()
        else {
            panic!("expected replace");
        };
        assert_eq!(snapshot.revision(), Some("b"));
        assert_eq!(snapshot.len(), 3);
        assert_eq!(entry.hash.as_deref(), Some("b"));
    }

    #[test]
    fn matching_revision_without_snapshot_still_fetches() {
        let mut sync = FreshnessSync::new();
        let ticket = FetchTicket(1);
        sync.begin(ticket, None, false, Utc::now());
        let step = sync.on_revision(ticket, Ok("a".into()), Utc::now()).unwrap();
        assert!(matches!(step, SyncStep::FetchCatalog { .. }));
    }

    #[test]
    fn revision_failure_with_snapshot_is_reported() {
        let mut sync = FreshnessSync::new();
        let ticket = FetchTicket(1);
        sync.begin(ticket, Some("a".into()), true, Utc::now());
        let result = sync.on_revision(
            ticket,
            Err(ChordsourceError::TransientFetch("offline".into())),
            Utc::now(),
        );
        assert!(matches!(result, Err(ChordsourceError::TransientFetch(_))));
        assert!(!sync.in_flight());
    }

    #[test]
    fn revision_failure_without_snapshot_falls_back_to_time_token() {
        let mut sync = FreshnessSync::new();
        let ticket = FetchTicket(1);
        let now = Utc::now();
        sync.begin(ticket, None, false, now);
        let step = sync
            .on_revision(ticket, Err(ChordsourceError::TransientFetch("offline".into())), now)
            .unwrap();
        assert_eq!(
            step,
            SyncStep::FetchCatalog {
                ticket,
                token: unknown_revision_token(now)
            }
        );
        let SyncStep::Replace { snapshot, .. } = sync.on_catalog(ticket, Ok(records(1))).unwrap()
        else {
            panic!("expected replace");
        };
        assert_eq!(snapshot.revision(), None);
    }

    #[test]
    fn responses_for_superseded_refresh_are_stale() {
        let mut sync = FreshnessSync::new();
        sync.begin(FetchTicket(1), None, false, Utc::now());
        sync.begin(FetchTicket(2), None, false, Utc::now());
        let step = sync
            .on_revision(FetchTicket(1), Ok("a".into()), Utc::now())
            .unwrap();
        assert_eq!(step, SyncStep::Stale { ticket: FetchTicket(1) });
        assert!(sync.in_flight());
    }

    #[derive(Default)]
    struct FakeRemote {
        revision: Option<String>,
        catalog: Vec<CatalogRecord>,
        revision_calls: usize,
        catalog_calls: usize,
    }

    impl RemoteSource for FakeRemote {
        fn fetch_revision(&mut self, _token: &str) -> Result<String> {
            self.revision_calls += 1;
            self.revision
                .clone()
                .ok_or_else(|| ChordsourceError::TransientFetch("HTTP 500".into()))
        }

        fn fetch_catalog(
            &mut self,
            _token: &str,
            progress: &mut dyn FnMut(LoadProgress),
        ) -> Result<Vec<CatalogRecord>> {
            self.catalog_calls += 1;
            progress(LoadProgress::new(50, Some(100)));
            progress(LoadProgress::new(100, Some(100)));
            Ok(self.catalog.clone())
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: std::collections::HashMap<String, CachedCatalog>,
    }

    impl PersistentCache for MemoryCache {
        fn get(&self, key: &str) -> Result<Option<CachedCatalog>> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &CachedCatalog) -> Result<()> {
            self.entries.insert(key.to_string(), value.clone());
            Ok(())
        }
    }

    fn cached_store(n: usize, revision: &str) -> CatalogStore {
        let mut store = CatalogStore::new();
        assert!(store.load_cached(Ok(Some(CachedCatalog::new(records(n), Some(revision.into()))))));
        store
    }

    #[test]
    fn reconcile_same_revision_skips_catalog() {
        let mut store = cached_store(3, "a");
        let before = store.snapshot();
        let mut remote = FakeRemote {
            revision: Some("a".into()),
            ..FakeRemote::default()
        };
        let mut cache = MemoryCache::default();

        let after = FreshnessSync::new()
            .reconcile(&mut store, &mut remote, &mut cache, "k", &mut |_| {})
            .unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(remote.catalog_calls, 0);
        assert!(cache.entries.is_empty());
        assert_eq!(store.state(), crate::catalog::CatalogState::Fresh);
    }

    #[test]
    fn reconcile_new_revision_replaces_and_persists() {
        let mut store = cached_store(3, "a");
        let mut remote = FakeRemote {
            revision: Some("b".into()),
            catalog: records(5),
            ..FakeRemote::default()
        };
        let mut cache = MemoryCache::default();
        let mut reported = Vec::new();

        let after = FreshnessSync::new()
            .reconcile(&mut store, &mut remote, &mut cache, "k", &mut |p: LoadProgress| {
                reported.push(p.percent());
            })
            .unwrap();
        assert_eq!(after.revision(), Some("b"));
        assert_eq!(after.len(), 5);
        assert_eq!(reported, vec![Some(50), Some(100)]);
        let persisted = cache.entries.get("k").unwrap();
        assert_eq!(persisted.hash.as_deref(), Some("b"));
        assert_eq!(persisted.data.len(), 5);
    }

    #[test]
    fn reconcile_failure_keeps_cached_snapshot() {
        let mut store = cached_store(500, "a");
        let mut remote = FakeRemote::default();
        let mut cache = MemoryCache::default();

        let result = FreshnessSync::new().reconcile(&mut store, &mut remote, &mut cache, "k", &mut |_| {});
        assert!(matches!(result, Err(ChordsourceError::TransientFetch(_))));
        assert_eq!(remote.catalog_calls, 0);
        assert_eq!(store.snapshot().len(), 500);
        assert_eq!(store.state(), crate::catalog::CatalogState::CacheLoaded);

        let engine = crate::search::QueryEngine::default();
        let results = engine.search("song 42", &store.snapshot());
        assert!(results.match_count() > 0);
    }

    #[test]
    fn catalog_without_request_is_stale() {
        let mut sync = FreshnessSync::new();
        let step = sync.on_catalog(FetchTicket(4), Ok(records(1))).unwrap();
        assert_eq!(step, SyncStep::Stale { ticket: FetchTicket(4) });
    }
}
