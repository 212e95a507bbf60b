//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the plugin runtime (main.rs) and the catalog,
//! search and worker layers.
//!
//! ```text
//! Keys / HTTP / Worker → Events → Event Handler → State Mutations → Actions → Side Effects
//!                                     ↑                                           ↓
//!                                     └───────── responses fed back as Events ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use state::AppState;
