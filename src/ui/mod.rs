//! Terminal UI rendering.
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready types computed from application state
//! - [`renderer`]: Top-level rendering entry point
//! - [`components`]: Per-section renderers
//! - [`helpers`]: Cursor positioning and Thai-aware width handling
//! - [`theme`]: Palette and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    FooterInfo, HeaderInfo, ResultRow, SearchBarInfo, SourceBadge, StatusLine, StatusTone,
    UIViewModel,
};
