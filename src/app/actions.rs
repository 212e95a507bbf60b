//! Side effects requested by the event handler.
//!
//! The handler never performs I/O itself. It returns actions and the plugin
//! runtime executes them: HTTP requests go through Zellij's `web_request`,
//! cache I/O through the worker, and opening a chord sheet through the
//! configured open command.

use crate::catalog::FetchTicket;
use crate::worker::WorkerMessage;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the cache worker.
    PostToWorker(WorkerMessage),

    /// Requests the revision document. The response must be fed back as
    /// [`Event::RevisionResponse`](crate::app::Event::RevisionResponse) with
    /// the same ticket.
    FetchRevision { ticket: FetchTicket, url: String },

    /// Requests the full catalog. The response must be fed back as
    /// [`Event::CatalogResponse`](crate::app::Event::CatalogResponse) with
    /// the same ticket.
    FetchCatalog { ticket: FetchTicket, url: String },

    /// Opens a chord sheet or web search in the user's browser.
    OpenUrl { url: String },
}
