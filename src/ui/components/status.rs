//! Status line renderer: loading progress, catalog summary, or no-match notice.

use crate::ui::helpers::{position_cursor, print_cell};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{StatusLine, StatusTone};

/// Renders the status line at `row`, or a blank line when there is none.
pub fn render_status(row: usize, status: Option<&StatusLine>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let Some(status) = status else {
        print!("{}", " ".repeat(cols));
        return row + 1;
    };

    if status.tone == StatusTone::Loading {
        print!("{}", Theme::bold());
    }
    print!("{}", Theme::fg(&theme.colors.status_fg));
    print!("  ");
    print_cell(&status.message, cols.saturating_sub(2));
    print!("{}", Theme::reset());
    row + 1
}
