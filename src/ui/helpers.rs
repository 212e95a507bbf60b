//! Shared rendering utilities.
//!
//! Terminal cells are counted with [`display_width`]: East Asian wide
//! characters take two cells, Thai above and below vowels and tone marks take
//! none. Byte or `char` counts misjudge both and break column alignment.

use unicode_width::UnicodeWidthChar;

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Returns `true` for Thai characters drawn on top of or below the previous
/// base character.
#[must_use]
pub const fn is_thai_combining(c: char) -> bool {
    matches!(c, '\u{0E31}' | '\u{0E34}'..='\u{0E3A}' | '\u{0E47}'..='\u{0E4E}')
}

/// Cells taken by a single character.
fn char_width(c: char) -> usize {
    if c.is_control() || is_thai_combining(c) {
        0
    } else {
        c.width().unwrap_or(0)
    }
}

/// Number of terminal cells `text` occupies.
///
/// # Examples
///
/// ```
/// use chordsource::ui::helpers::display_width;
///
/// assert_eq!(display_width("Yellow"), 6);
/// assert_eq!(display_width("สวัสดี"), 4);
/// assert_eq!(display_width("夜に駆ける"), 10);
/// ```
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Truncates `text` to at most `width` cells, ending with `…` when cut.
///
/// Combining marks stay attached to their base character. A wide character
/// that would overflow is dropped whole, so the result can be one cell short.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        if c.is_control() {
            continue;
        }
        let w = char_width(c);
        if w > 0 {
            if used + w > budget {
                break;
            }
            used += w;
        }
        out.push(c);
    }
    out.push('…');
    out
}

/// Prints `text` truncated to `width` cells and padded with spaces to exactly
/// `width` cells.
pub fn print_cell(text: &str, width: usize) {
    let shown = truncate_to_width(text, width);
    let pad = width.saturating_sub(display_width(&shown));
    print!("{shown}{}", " ".repeat(pad));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_marks_are_zero_width() {
        assert_eq!(display_width("ไม้เอก"), 5);
        assert_eq!(display_width("น้ำ"), 2);
        assert_eq!(display_width("ที่"), 1);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        assert_eq!(display_width("漢字"), 4);
        assert_eq!(display_width("ＡＢ"), 4);
        assert_eq!(display_width("ดนตรี 音楽"), 9);
    }

    #[test]
    fn wide_text_is_cut_to_fit() {
        assert_eq!(truncate_to_width("夜に駆ける", 5), "夜に…");
        assert_eq!(truncate_to_width("夜に駆ける", 6), "夜に…");
        assert!(display_width(&truncate_to_width("夜に駆ける", 6)) <= 6);
        assert_eq!(truncate_to_width("漢字", 4), "漢字");
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("abc", 3), "abc");
        assert_eq!(truncate_to_width("สวัสดี", 4), "สวัสดี");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(display_width(&truncate_to_width("สวัสดีครับ", 5)), 5);
        assert_eq!(truncate_to_width("abcdef", 0), "");
    }

    #[test]
    fn cut_keeps_marks_with_their_base() {
        assert_eq!(truncate_to_width("ที่นี่นะ", 2), "ที่…");
    }
}
