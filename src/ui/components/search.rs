//! Search bar component renderer.

use crate::ui::helpers::{display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

/// Shown in the box while the query is empty.
const PLACEHOLDER: &str = "พิมพ์ชื่อเพลงหรือศิลปิน";

/// Renders the 3-line search box at `row` and returns the next free row.
///
/// ```text
/// [margin] ┌─────────────┐ [margin]
/// [margin] │ query▏      │ [margin]
/// [margin] └─────────────┘ [margin]
/// ```
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let inner_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2 + 2);
    let border = Theme::fg(&theme.colors.search_bar_border);
    let rule = "─".repeat(inner_width);

    let (text, color) = if search.query.is_empty() {
        (format!(" {PLACEHOLDER}"), &theme.colors.text_dim)
    } else {
        (format!(" {}▏", search.query), &theme.colors.text_normal)
    };
    let text = truncate_to_width(&text, inner_width);
    let fill = " ".repeat(inner_width.saturating_sub(display_width(&text)));
    let margin = " ".repeat(SEARCH_BOX_MARGIN);
    let reset = Theme::reset();

    position_cursor(row, 1);
    print!("{margin}{border}┌{rule}┐{reset}");

    position_cursor(row + 1, 1);
    print!("{margin}{border}│{}{text}{fill}{border}│{reset}", Theme::fg(color));

    position_cursor(row + 2, 1);
    print!("{margin}{border}└{rule}┘{reset}");

    row + 3
}
