//! Header component renderer.

use crate::ui::helpers::{display_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Marker appended to the title while the catalog may be out of date.
const STALE_MARKER: &str = "(ออฟไลน์)";

/// Renders the centered title bar at `row` and returns the next free row.
///
/// The title shows the catalog size once one is published.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = if header.record_count > 0 {
        format!("{}· {} ", header.title, header.record_count)
    } else {
        header.title.clone()
    };
    let marker = if header.stale { STALE_MARKER } else { "" };
    let marker_len = if header.stale { display_width(marker) + 1 } else { 0 };

    let title_len = display_width(&title) + marker_len;
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{title}");
    if header.stale {
        print!("{}{marker} {}", Theme::fg(&theme.colors.warning_fg), Theme::fg(&theme.colors.header_fg));
    }
    print!("{}", " ".repeat(cols.saturating_sub(padding + title_len)));

    print!("{}", Theme::reset());
    row + 1
}
