//! Event handling and state transition logic.
//!
//! The handler turns user input, cache worker replies and HTTP responses into
//! state changes and a list of [`Action`]s for the plugin runtime to execute.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `Activate`
//! - **Input**: `Char`, `Backspace`, `ClearQuery`
//! - **Lifecycle**: `PermissionsGranted`, `Refresh`, `CloseFocus`
//! - **Sync**: `RevisionResponse`, `CatalogResponse`, `CatalogProgress`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use chordsource::{handle_event, AppState, Config, Event};
//!
//! let mut state = AppState::new(&Config::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::Char('a'))?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::{Action, AppState};
use crate::catalog::FetchTicket;
use crate::domain::error::Result;
use crate::remote::{check_status, parse_catalog, parse_revision, LoadProgress};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, HTTP responses, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves selection down by one position (wraps to top).
    KeyDown,
    /// Moves selection up by one position (wraps to bottom).
    KeyUp,
    /// Opens the selected hit.
    Activate,
    /// Closes the floating pane and hides the plugin UI.
    CloseFocus,
    /// Appends a character to the query.
    Char(char),
    /// Removes the last character from the query.
    Backspace,
    /// Empties the query.
    ClearQuery,
    /// Starts a new freshness check.
    Refresh,

    /// The host granted the permissions requested at load.
    ///
    /// Triggers the cache read that precedes the first freshness check.
    PermissionsGranted,

    /// Wraps a response from the cache worker thread.
    WorkerResponse(WorkerResponse),

    /// Raw response to a revision request.
    RevisionResponse {
        ticket: FetchTicket,
        status: u16,
        body: Vec<u8>,
    },

    /// Raw response to a catalog request.
    CatalogResponse {
        ticket: FetchTicket,
        status: u16,
        body: Vec<u8>,
    },

    /// Download progress of the catalog request.
    CatalogProgress(LoadProgress),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean is `true` when the view changed and should be re-rendered.
///
/// Fetch failures never surface as errors: they are logged, recorded on the
/// state for display, and the published catalog stays in use.
///
/// # Errors
///
/// Returns errors from state transitions that cannot be recovered locally.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::Activate => Ok(state.selected_hit().map_or_else(
            || {
                tracing::debug!("nothing selected");
                (false, vec![])
            },
            |hit| {
                tracing::debug!(url = %hit.record.url, fallback = hit.is_fallback(), "opening hit");
                (
                    false,
                    vec![Action::OpenUrl {
                        url: hit.record.url.clone(),
                    }],
                )
            },
        )),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Char(c) => {
            state.query.push(*c);
            tracing::trace!(query = %state.query, "query updated");
            state.run_query();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.query.pop().is_none() {
                return Ok((false, vec![]));
            }
            state.run_query();
            Ok((true, vec![]))
        }
        Event::ClearQuery => {
            if state.query.is_empty() {
                return Ok((false, vec![]));
            }
            state.query.clear();
            state.run_query();
            Ok((true, vec![]))
        }
        Event::Refresh => Ok((true, state.start_refresh())),
        Event::PermissionsGranted => {
            tracing::debug!(key = state.cache_key(), "requesting cached catalog");
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::load_cache(
                    state.cache_key().to_string(),
                ))],
            ))
        }
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
        Event::RevisionResponse {
            ticket,
            status,
            body,
        } => {
            let result = check_status(*status).and_then(|()| parse_revision(body));
            let step = state.sync_mut().on_revision(*ticket, result, chrono::Utc::now());
            Ok(match step {
                Ok(step) => (true, state.apply_step(step)),
                Err(e) => {
                    state.record_failure(*ticket, &e);
                    (true, vec![])
                }
            })
        }
        Event::CatalogResponse {
            ticket,
            status,
            body,
        } => {
            let result = check_status(*status).and_then(|()| parse_catalog(body));
            let step = state.sync_mut().on_catalog(*ticket, result);
            Ok(match step {
                Ok(step) => (true, state.apply_step(step)),
                Err(e) => {
                    state.record_failure(*ticket, &e);
                    (true, vec![])
                }
            })
        }
        Event::CatalogProgress(progress) => {
            state.set_progress(*progress);
            Ok((true, vec![]))
        }
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::CacheLoaded { entry } => {
            tracing::debug!(record_count = entry.data.len(), "cached catalog received");
            state.apply_cache_result(Ok(Some(entry.clone())));
            (true, state.start_refresh())
        }
        WorkerResponse::CacheMissing => {
            state.apply_cache_result(Ok(None));
            (true, state.start_refresh())
        }
        WorkerResponse::Error {
            message,
            during_load: true,
        } => {
            state.apply_cache_result(Err(crate::ChordsourceError::CacheRead(message.clone())));
            (true, state.start_refresh())
        }
        WorkerResponse::Error { message, .. } => {
            tracing::warn!(error = %message, "cache worker error");
            (false, vec![])
        }
        WorkerResponse::CacheStored { record_count } => {
            tracing::debug!(record_count, "catalog persisted");
            (false, vec![])
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::KeyDown => "key_down",
        Event::KeyUp => "key_up",
        Event::Activate => "activate",
        Event::CloseFocus => "close_focus",
        Event::Char(_) => "char",
        Event::Backspace => "backspace",
        Event::ClearQuery => "clear_query",
        Event::Refresh => "refresh",
        Event::PermissionsGranted => "permissions_granted",
        Event::WorkerResponse(_) => "worker_response",
        Event::RevisionResponse { .. } => "revision_response",
        Event::CatalogResponse { .. } => "catalog_response",
        Event::CatalogProgress(_) => "catalog_progress",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogState;
    use crate::domain::CatalogRecord;
    use crate::storage::CachedCatalog;
    use crate::Config;

    fn records() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord::new("1", "สวัสดี", "ศิลปิน", "https://chordtabs.in.th/1"),
            CatalogRecord::new("2", "Yellow", "Coldplay", "https://busk.co/2"),
        ]
    }

    fn ticket_of(actions: &[Action]) -> FetchTicket {
        match actions {
            [Action::FetchRevision { ticket, .. } | Action::FetchCatalog { ticket, .. }] => *ticket,
            other => panic!("expected a single fetch action, got {other:?}"),
        }
    }

    #[test]
    fn permissions_request_cache_load() {
        let mut state = AppState::new(&Config::default());
        let (_, actions) = handle_event(&mut state, &Event::PermissionsGranted).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadCache { key, .. })] if key == "chordsource"
        ));
    }

    #[test]
    fn cold_start_fetches_catalog_and_persists_it() {
        let mut state = AppState::new(&Config::default());
        let (_, actions) =
            handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::CacheMissing)).unwrap();
        let ticket = ticket_of(&actions);

        let (_, actions) = handle_event(
            &mut state,
            &Event::RevisionResponse {
                ticket,
                status: 200,
                body: br#"{"hash":"r1"}"#.to_vec(),
            },
        )
        .unwrap();
        assert!(matches!(actions.as_slice(), [Action::FetchCatalog { url, .. }] if url.ends_with("?rev=r1")));

        let body = serde_json::to_vec(&records()).unwrap();
        let (_, actions) = handle_event(
            &mut state,
            &Event::CatalogResponse {
                ticket,
                status: 200,
                body,
            },
        )
        .unwrap();
        assert_eq!(state.store().state(), CatalogState::Fresh);
        assert_eq!(state.store().revision(), Some("r1"));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::StoreCache { entry, .. })] if entry.data.len() == 2
        ));
    }

    #[test]
    fn matching_revision_keeps_cached_snapshot() {
        let mut state = AppState::new(&Config::default());
        let entry = CachedCatalog::new(records(), Some("r1".into()));
        let (_, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::CacheLoaded { entry }),
        )
        .unwrap();
        assert_eq!(state.store().state(), CatalogState::CacheLoaded);
        let before = state.store().snapshot();

        let (_, actions) = handle_event(
            &mut state,
            &Event::RevisionResponse {
                ticket: ticket_of(&actions),
                status: 200,
                body: br#"{"hash":"r1"}"#.to_vec(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.store().state(), CatalogState::Fresh);
        assert!(std::sync::Arc::ptr_eq(&before, &state.store().snapshot()));
    }

    #[test]
    fn failed_revision_keeps_cached_results() {
        let mut state = AppState::new(&Config::default());
        let entry = CachedCatalog::new(records(), Some("r1".into()));
        let (_, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::CacheLoaded { entry }),
        )
        .unwrap();

        let (_, actions) = handle_event(
            &mut state,
            &Event::RevisionResponse {
                ticket: ticket_of(&actions),
                status: 503,
                body: vec![],
            },
        )
        .unwrap();
        assert!(actions.is_empty());
        assert!(state.last_error().is_some());
        assert_eq!(state.store().snapshot().len(), 2);

        handle_event(&mut state, &Event::Char('Y')).unwrap();
        assert_eq!(state.results().match_count(), 1);
    }

    #[test]
    fn superseded_response_is_ignored() {
        let mut state = AppState::new(&Config::default());
        let (_, first) = handle_event(&mut state, &Event::Refresh).unwrap();
        let (_, second) = handle_event(&mut state, &Event::Refresh).unwrap();
        assert_ne!(ticket_of(&first), ticket_of(&second));

        let (_, actions) = handle_event(
            &mut state,
            &Event::RevisionResponse {
                ticket: ticket_of(&first),
                status: 200,
                body: br#"{"hash":"old"}"#.to_vec(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.store().state(), CatalogState::Empty);
    }

    #[test]
    fn activate_opens_selected_hit() {
        let mut state = AppState::new(&Config::default());
        state.apply_cache_result(Ok(Some(CachedCatalog::new(records(), None))));
        for c in "yellow".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        let (render, actions) = handle_event(&mut state, &Event::Activate).unwrap();
        assert!(!render);
        assert_eq!(
            actions,
            vec![Action::OpenUrl {
                url: "https://busk.co/2".into()
            }]
        );

        handle_event(&mut state, &Event::KeyUp).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Activate).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::OpenUrl { url }] if url.starts_with("https://www.google.com/search?q=yellow")
        ));
    }

    #[test]
    fn editing_an_empty_query_does_not_render() {
        let mut state = AppState::new(&Config::default());
        assert_eq!(handle_event(&mut state, &Event::Backspace).unwrap(), (false, vec![]));
        assert_eq!(handle_event(&mut state, &Event::ClearQuery).unwrap(), (false, vec![]));
    }
}
