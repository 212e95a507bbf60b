//! Top-level rendering coordinator.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI output
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;

/// Renders the plugin UI to stdout.
///
/// Does not clear the screen; Zellij redraws the pane on every render.
pub fn render(state: &AppState, theme: &Theme, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, theme, cols, rows);
}
