//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with catalog size and stale marker
//! - [`search`]: Search input box
//! - [`status`]: Loading progress, catalog summary or no-match notice
//! - [`table`]: Result rows with artist column and source badge
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines]
//! [Status]
//! [Result Rows]
//! [Blank padding to fill screen]
//! [Border]
//! [Footer]
//! ```

mod footer;
mod header;
mod search;
mod status;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use footer::render_footer;
use header::render_header;
use search::render_search_bar;
use status::render_status;
use table::render_result_rows;

/// Renders a horizontal border at `row` and returns the next free row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full layout. Reserves 9 lines for chrome.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_search_bar(current_row, &vm.search_bar, theme, cols);
    current_row = render_status(current_row, vm.status.as_ref(), theme, cols);
    let _current_row = render_result_rows(current_row, &vm.rows, theme, cols);

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}
