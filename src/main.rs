//! Zellij plugin wrapper and entry point.
//!
//! This is the thin integration layer between the chordsource library and the
//! Zellij plugin system. It implements `ZellijPlugin` for the UI thread and
//! registers a `ZellijWorker` shim around the library's cache worker.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │      web_request
//! │  │  State (plugin)  │───┼──────────────────▶ catalog / metadata
//! │  └──────────────────┘   │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ CacheWorkerShim  │   │  ← JSON file cache
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! - `Key(Down)` / `Ctrl+n` → `Event::KeyDown`
//! - `Key(Up)` / `Ctrl+p` → `Event::KeyUp`
//! - `Key(Enter)` → `Event::Activate`
//! - `Key(Esc)` → `Event::ClearQuery`, or `Event::CloseFocus` with an empty query
//! - `Ctrl+u` → `Event::ClearQuery`, `Ctrl+r` → `Event::Refresh`
//! - `WebRequestResult` → `Event::RevisionResponse` / `Event::CatalogResponse`
//! - `CustomMessage` from the worker → `Event::WorkerResponse`

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use chordsource::catalog::FetchTicket;
use chordsource::worker::{CatalogWorker, WorkerMessage, WorkerResponse};
use chordsource::{handle_event, Action, AppState, Config, Event, Theme};

/// Name shared by the worker registration and every IPC message.
const WORKER_NAME: &str = "chordsource";

const CONTEXT_KIND: &str = "kind";
const CONTEXT_TICKET: &str = "ticket";
const KIND_REVISION: &str = "revision";
const KIND_CATALOG: &str = "catalog";

static TRACING: Once = Once::new();

register_plugin!(State);
register_worker!(CacheWorkerShim, chordsource_worker, CHORDSOURCE_WORKER);

/// Worker thread entry point. All work is delegated to [`CatalogWorker`].
#[derive(Default, Serialize, Deserialize)]
struct CacheWorkerShim {
    #[serde(skip)]
    worker: CatalogWorker,
}

impl ZellijWorker<'_> for CacheWorkerShim {
    fn on_message(&mut self, message: String, payload: String) {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "worker ignoring unknown message");
            return;
        }
        if let Some(response) = self.worker.handle_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                worker_name: None,
                name: WORKER_NAME.to_string(),
                payload: response,
            });
        }
    }
}

/// Plugin state wrapper.
struct State {
    app: AppState,
    theme: Theme,
    open_command: String,
}

impl Default for State {
    fn default() -> Self {
        let config = Config::default();
        Self {
            app: chordsource::initialize(&config),
            theme: Theme::default(),
            open_command: config.open_command,
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, requests permissions and subscribes to events.
    ///
    /// The cache is read once permissions are granted.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let (config, problems) = Config::parse(&configuration);
        TRACING.call_once(|| chordsource::observability::init_tracing(&config));

        let _guard = tracing::debug_span!("plugin_load").entered();
        for problem in &problems {
            tracing::warn!(error = %problem, "invalid configuration value, using defaults");
        }

        self.app = chordsource::initialize(&config);
        self.open_command.clone_from(&config.open_command);

        tracing::debug!("requesting permissions");
        request_permission(&[PermissionType::WebAccess, PermissionType::RunCommands]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match Self::map_web_result_event(status, body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Granted) => {
                tracing::debug!("permissions granted");
                Event::PermissionsGranted
            }
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Denied) => {
                tracing::warn!("permissions denied - catalog cannot be loaded");
                return false;
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in actions {
                    self.execute_action(&action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        chordsource::ui::render(&self.app, &self.theme, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::trace!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                BareKey::Char('u') => Some(Event::ClearQuery),
                BareKey::Char('r') => Some(Event::Refresh),
                BareKey::Char('c') => Some(Event::CloseFocus),
                _ => None,
            };
        }

        Some(match key.bare_key {
            BareKey::Down => Event::KeyDown,
            BareKey::Up => Event::KeyUp,
            BareKey::Enter => Event::Activate,
            BareKey::Esc if self.app.query.is_empty() => Event::CloseFocus,
            BareKey::Esc => Event::ClearQuery,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }
        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Maps a finished `web_request` back to the refresh that issued it.
    fn map_web_result_event(
        status: u16,
        body: Vec<u8>,
        context: &BTreeMap<String, String>,
    ) -> Option<Event> {
        let Some(ticket) = context
            .get(CONTEXT_TICKET)
            .and_then(|t| t.parse::<u64>().ok())
            .map(FetchTicket)
        else {
            tracing::debug!("web response without a ticket");
            return None;
        };
        tracing::debug!(ticket = ticket.0, status, body_len = body.len(), "web response");

        match context.get(CONTEXT_KIND).map(String::as_str) {
            Some(KIND_REVISION) => Some(Event::RevisionResponse { ticket, status, body }),
            Some(KIND_CATALOG) => Some(Event::CatalogResponse { ticket, status, body }),
            other => {
                tracing::debug!(kind = ?other, "web response of unknown kind");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    fn request(kind: &str, ticket: FetchTicket, url: &str) {
        let context = BTreeMap::from([
            (CONTEXT_KIND.to_string(), kind.to_string()),
            (CONTEXT_TICKET.to_string(), ticket.0.to_string()),
        ]);
        web_request(url, HttpVerb::Get, BTreeMap::new(), vec![], context);
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::FetchRevision { ticket, url } => Self::request(KIND_REVISION, *ticket, url),
            Action::FetchCatalog { ticket, url } => Self::request(KIND_CATALOG, *ticket, url),
            Action::OpenUrl { url } => {
                tracing::debug!(command = %self.open_command, url = %url, "opening url");
                run_command(&[self.open_command.as_str(), url.as_str()], BTreeMap::new());
                hide_self();
            }
        }
    }
}
