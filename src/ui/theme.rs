//! Color palette and ANSI escape sequence generation.
//!
//! The palette is fixed: slate backgrounds with a yellow highlight for the
//! selected row. Colors are hex strings converted to 24-bit ANSI sequences.
//!
//! # Example
//!
//! ```rust
//! use chordsource::ui::Theme;
//!
//! let theme = Theme::default();
//! print!("{}{}{}", Theme::fg(&theme.colors.selection_fg), "selected", Theme::reset());
//! ```

/// Color scheme for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub header_fg: String,
    pub header_bg: Option<String>,

    /// Selected row foreground color.
    pub selection_fg: String,
    /// Selected row background color.
    pub selection_bg: String,

    pub text_normal: String,
    /// Artist column, footer and other secondary text.
    pub text_dim: String,

    pub border: String,
    pub search_bar_border: String,

    /// Source badge color.
    pub badge_fg: String,

    /// Loading and informational status line color.
    pub status_fg: String,
    /// Stale catalog marker color.
    pub warning_fg: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ThemeColors {
                header_fg: "#f8fafc".to_string(),
                header_bg: Some("#0f172a".to_string()),
                selection_fg: "#fde047".to_string(),
                selection_bg: "#1e293b".to_string(),
                text_normal: "#e2e8f0".to_string(),
                text_dim: "#64748b".to_string(),
                border: "#334155".to_string(),
                search_bar_border: "#fde047".to_string(),
                badge_fg: "#38bdf8".to_string(),
                status_fg: "#94a3b8".to_string(),
                warning_fg: "#f97316".to_string(),
            },
        }
    }
}

impl Theme {
    /// Converts a hex color to an RGB tuple.
    ///
    /// Returns white on malformed input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground color sequence for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color sequence for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_colors_render_as_truecolor() {
        let theme = Theme::default();
        assert_eq!(Theme::fg(&theme.colors.selection_fg), "\u{1b}[38;2;253;224;71m");
        assert_eq!(Theme::bg(&theme.colors.selection_bg), "\u{1b}[48;2;30;41;59m");
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        assert_eq!(Theme::fg("#abc"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::fg("#zzzzzz"), "\u{1b}[38;2;255;255;255m");
    }
}
