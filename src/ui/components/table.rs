//! Result list renderer.
//!
//! Each row shows the title, the artist in a dimmed column, and the source
//! badge right-aligned. The selected row is drawn in the selection colors
//! across the full width.

use crate::ui::helpers::{display_width, position_cursor, print_cell};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ResultRow;

/// Widest the artist column gets.
const ARTIST_WIDTH: usize = 24;

/// Leading selection marker plus its padding.
const MARKER_WIDTH: usize = 2;

/// Renders `rows` starting at `row` and returns the next free row.
pub fn render_result_rows(row: usize, rows: &[ResultRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in rows {
        current_row = render_result_row(current_row, item, theme, cols);
    }
    current_row
}

fn render_result_row(row: usize, item: &ResultRow, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base_fg = if item.is_selected {
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        &theme.colors.selection_fg
    } else {
        &theme.colors.text_normal
    };
    print!("{}", Theme::fg(base_fg));
    print!("{}", if item.is_selected { "› " } else { "  " });

    let badge = item.badge.map(|b| format!(" [{}]", b.label())).unwrap_or_default();
    let badge_width = display_width(&badge);
    let content = cols.saturating_sub(MARKER_WIDTH + badge_width);
    let artist_width = if item.artist.is_empty() {
        0
    } else {
        ARTIST_WIDTH.min(content / 3)
    };
    let title_width = content.saturating_sub(artist_width);

    if item.is_fallback {
        print!("{}", Theme::dim());
    } else if item.is_selected {
        print!("{}", Theme::bold());
    }
    print_cell(&item.title, title_width);
    if item.is_fallback || item.is_selected {
        // Reset also drops the row background.
        print!("{}", Theme::reset());
        if item.is_selected {
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        }
    }

    if artist_width > 0 {
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print_cell(&item.artist, artist_width);
    }

    if badge_width > 0 {
        print!("{}{badge}", Theme::fg(&theme.colors.badge_fg));
    }

    print!("{}", Theme::reset());
    row + 1
}
