//! Application state and view model computation.
//!
//! [`AppState`] is the single owner of everything the plugin shows: the
//! catalog store, the in-flight freshness check, the current query with its
//! results, and the selection over them. View models are computed on demand
//! from a snapshot of this state.

use crate::catalog::{CatalogState, CatalogStore, FetchTicket, FreshnessSync, SyncStep};
use crate::domain::{ChordsourceError, Result};
use crate::remote::{Endpoints, LoadProgress, LOADING_MESSAGE};
use crate::search::{QueryEngine, RankedResultList, SearchHit, SelectionController};
use crate::storage::CachedCatalog;
use crate::ui::viewmodel::{
    FooterInfo, HeaderInfo, ResultRow, SearchBarInfo, SourceBadge, StatusLine, StatusTone,
    UIViewModel,
};
use crate::worker::WorkerMessage;
use crate::Config;

use super::Action;

/// Shown with an empty query once a catalog is available.
const SUMMARY_PREFIX: &str = "ค้นหาคอร์ดจากทั้งหมด";

/// Shown when a query matched no catalog record.
pub const NO_RESULTS_MESSAGE: &str = "ไม่พบคอร์ดที่ค้นหา";

/// Label prefix of the fallback row.
const WEB_SEARCH_LABEL: &str = "ค้นหาบนเว็บ";

/// Rows taken by header, borders, search bar, status line and footer.
const CHROME_ROWS: usize = 9;

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// Current search query.
    pub query: String,

    store: CatalogStore,
    sync: FreshnessSync,
    engine: QueryEngine,
    endpoints: Endpoints,
    cache_key: String,

    results: RankedResultList,
    selection: SelectionController,

    /// Catalog download progress while no catalog is published.
    progress: Option<LoadProgress>,

    /// Most recent refresh failure, cleared by the next successful one.
    last_error: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            query: String::new(),
            store: CatalogStore::new(),
            sync: FreshnessSync::new(),
            engine: config.query_engine(),
            endpoints: config.endpoints(),
            cache_key: config.cache_key.clone(),
            results: RankedResultList::default(),
            selection: SelectionController::new(),
            progress: None,
            last_error: None,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }

    #[must_use]
    pub const fn results(&self) -> &RankedResultList {
        &self.results
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selection.index()
    }

    #[must_use]
    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.selection.activate(&self.results)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub const fn progress(&self) -> Option<LoadProgress> {
        self.progress
    }

    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn move_selection_down(&mut self) {
        self.selection.next();
    }

    pub fn move_selection_up(&mut self) {
        self.selection.prev();
    }

    /// Re-runs the current query against the published snapshot.
    pub fn run_query(&mut self) {
        let snapshot = self.store.snapshot();
        self.results = self.engine.search(&self.query, &snapshot);
        self.selection.observe(&self.results);
    }

    /// Applies the outcome of reading the persistent cache.
    ///
    /// Returns `true` when a cached catalog was published.
    pub fn apply_cache_result(&mut self, cached: Result<Option<CachedCatalog>>) -> bool {
        let loaded = self.store.load_cached(cached);
        if loaded {
            self.run_query();
        }
        loaded
    }

    /// Starts a freshness check, superseding any check still in flight.
    pub fn start_refresh(&mut self) -> Vec<Action> {
        let ticket = self.store.begin_refresh();
        let step = self.sync.begin(
            ticket,
            self.store.revision().map(str::to_owned),
            self.store.has_catalog(),
            chrono::Utc::now(),
        );
        self.apply_step(step)
    }

    /// Records a failed refresh step. The published snapshot stays in use.
    pub(crate) fn record_failure(&mut self, ticket: FetchTicket, error: &ChordsourceError) {
        self.store.fail(ticket, error);
        self.last_error = Some(error.to_string());
        if self.store.has_catalog() {
            self.progress = None;
        }
    }

    pub(crate) fn sync_mut(&mut self) -> &mut FreshnessSync {
        &mut self.sync
    }

    pub(crate) fn set_progress(&mut self, progress: LoadProgress) {
        if !self.store.has_catalog() {
            self.progress = Some(progress);
        }
    }

    /// Turns a freshness step into the actions that carry it out.
    pub(crate) fn apply_step(&mut self, step: SyncStep) -> Vec<Action> {
        match step {
            SyncStep::FetchRevision { ticket, token } => vec![Action::FetchRevision {
                ticket,
                url: self.endpoints.revision_url(&token),
            }],
            SyncStep::FetchCatalog { ticket, token } => {
                if !self.store.has_catalog() {
                    self.progress = Some(LoadProgress::default());
                }
                vec![Action::FetchCatalog {
                    ticket,
                    url: self.endpoints.catalog_url(&token),
                }]
            }
            SyncStep::UpToDate { ticket } => {
                self.store.confirm(ticket);
                self.last_error = None;
                vec![]
            }
            SyncStep::Replace {
                ticket,
                snapshot,
                entry,
            } => {
                if !self.store.commit(ticket, snapshot) {
                    return vec![];
                }
                self.progress = None;
                self.last_error = None;
                self.run_query();
                vec![Action::PostToWorker(WorkerMessage::store_cache(
                    self.cache_key.clone(),
                    entry,
                ))]
            }
            SyncStep::Stale { ticket } => {
                tracing::debug!(ticket = ticket.0, "dropping response for superseded refresh");
                vec![]
            }
        }
    }

    /// Computes a renderable view model for a pane of `rows` lines.
    ///
    /// The visible window of results is centered on the selection where
    /// possible. Column widths are left to the renderer.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, _cols: usize) -> UIViewModel {
        let hits = self.results.hits();
        let available_rows = rows.saturating_sub(CHROME_ROWS).max(1);
        let selected = self.selection.index();

        let mut visible_start = selected.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(hits.len());
        if visible_end - visible_start < available_rows && hits.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let display_rows = hits[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(offset, hit)| Self::compute_row(hit, visible_start + offset == selected))
            .collect();

        UIViewModel {
            header: self.compute_header(),
            search_bar: SearchBarInfo {
                query: self.query.clone(),
            },
            rows: display_rows,
            selected_index: selected.saturating_sub(visible_start),
            status: self.compute_status(),
            footer: FooterInfo {
                keybindings: "↑/↓ or Ctrl+n/p: navigate  Enter: open  Ctrl+u: clear  Ctrl+r: refresh  Esc: close"
                    .to_string(),
            },
        }
    }

    fn compute_row(hit: &SearchHit, is_selected: bool) -> ResultRow {
        if hit.is_fallback() {
            return ResultRow {
                title: format!("{WEB_SEARCH_LABEL}: {}", hit.record.title),
                artist: String::new(),
                badge: None,
                is_selected,
                is_fallback: true,
            };
        }
        ResultRow {
            title: hit.record.title.clone(),
            artist: hit.record.artist.clone(),
            badge: SourceBadge::from_url(&hit.record.url),
            is_selected,
            is_fallback: false,
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let stale = self.last_error.is_some() && self.store.state() != CatalogState::Fresh;
        HeaderInfo {
            title: " ChordSource ".to_string(),
            record_count: self.store.snapshot().len(),
            stale,
        }
    }

    fn compute_status(&self) -> Option<StatusLine> {
        if !self.store.has_catalog() {
            let message = self
                .progress
                .map_or_else(|| LOADING_MESSAGE.to_string(), |p| p.status_text());
            return Some(StatusLine {
                message,
                tone: StatusTone::Loading,
            });
        }

        if self.query.is_empty() {
            return Some(StatusLine {
                message: format!("{SUMMARY_PREFIX} {} รายการ", self.store.snapshot().len()),
                tone: StatusTone::Info,
            });
        }

        (self.results.match_count() == 0).then(|| StatusLine {
            message: NO_RESULTS_MESSAGE.to_string(),
            tone: StatusTone::Info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogRecord;

    fn cached(n: usize) -> CachedCatalog {
        CachedCatalog::new(
            (0..n)
                .map(|i| {
                    CatalogRecord::new(
                        i.to_string(),
                        format!("เพลง {i}"),
                        "ศิลปิน",
                        format!("https://chordtabs.in.th/{i}"),
                    )
                })
                .collect(),
            Some("a".into()),
        )
    }

    #[test]
    fn empty_store_shows_loading_status() {
        let state = AppState::new(&Config::default());
        let vm = state.compute_viewmodel(24, 80);
        let status = vm.status.unwrap();
        assert_eq!(status.tone, StatusTone::Loading);
        assert_eq!(status.message, LOADING_MESSAGE);
    }

    #[test]
    fn empty_query_shows_catalog_summary() {
        let mut state = AppState::new(&Config::default());
        state.apply_cache_result(Ok(Some(cached(3))));
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.status.unwrap().message, "ค้นหาคอร์ดจากทั้งหมด 3 รายการ");
        assert!(vm.rows.is_empty());
        assert_eq!(vm.header.record_count, 3);
    }

    #[test]
    fn unmatched_query_shows_fallback_row_and_notice() {
        let mut state = AppState::new(&Config::default());
        state.apply_cache_result(Ok(Some(cached(3))));
        state.query = "zzzzqqqq".into();
        state.run_query();
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.status.unwrap().message, NO_RESULTS_MESSAGE);
        assert_eq!(vm.rows.len(), 1);
        assert!(vm.rows[0].is_fallback);
        assert!(vm.rows[0].is_selected);
    }

    #[test]
    fn window_follows_selection() {
        let mut state = AppState::new(&Config::default());
        state.apply_cache_result(Ok(Some(cached(30))));
        state.query = "เพลง".into();
        state.run_query();
        assert_eq!(state.results().len(), 31);

        for _ in 0..20 {
            state.move_selection_down();
        }
        let vm = state.compute_viewmodel(CHROME_ROWS + 10, 80);
        assert_eq!(vm.rows.len(), 10);
        assert!(vm.rows[vm.selected_index].is_selected);
        assert_eq!(vm.rows.iter().filter(|r| r.is_selected).count(), 1);
        assert_eq!(vm.rows[0].badge, Some(SourceBadge::Chordtabs));
    }

    #[test]
    fn refresh_starts_with_revision_request() {
        let mut state = AppState::new(&Config::default());
        let actions = state.start_refresh();
        assert!(matches!(
            actions.as_slice(),
            [Action::FetchRevision { url, .. }] if url.starts_with("https://db.chord.source.in.th/metadata.json?rev=")
        ));
    }
}
