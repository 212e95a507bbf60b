//! Keyboard layout remapping.
//!
//! Users often start typing with the wrong input method active: a Thai song
//! title typed while the keyboard is still set to US QWERTY comes out as
//! `iydgTv` instead of `รักเธอ`. Remapping translates each character to the
//! character the same physical key produces under another layout.
//!
//! Remapping is total. Characters a layout cannot produce (spaces, digits of
//! other scripts, emoji) pass through unchanged.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::ChordsourceError;

/// Number of printable keys covered by every layout table.
const KEY_COUNT: usize = 94;

/// US QWERTY keys: unshifted rows top to bottom, then the same keys shifted.
const US_QWERTY: &str = concat!(
    "`1234567890-=",
    "qwertyuiop[]\\",
    "asdfghjkl;'",
    "zxcvbnm,./",
    "~!@#$%^&*()_+",
    "QWERTYUIOP{}|",
    "ASDFGHJKL:\"",
    "ZXCVBNM<>?",
);

/// Thai Kedmanee keys in the same physical order as [`US_QWERTY`].
const THAI_KEDMANEE: &str = concat!(
    "_ๅ/-ภถุึคตจขช",
    "ๆไำพะัีรนยบลฃ",
    "ฟหกดเ้่าสวง",
    "ผปแอิืทมใฝ",
    "%+๑๒๓๔ู฿๕๖๗๘๙",
    "๐\"ฎฑธํ๊ณฯญฐ,ฅ",
    "ฤฆฏโฌ็๋ษศซ.",
    "()ฉฮฺ์?ฒฬฦ",
);

/// A physical keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardLayout {
    UsQwerty,
    ThaiKedmanee,
}

impl KeyboardLayout {
    /// Characters produced by each physical key, in a layout-independent order.
    const fn keys(self) -> &'static str {
        match self {
            Self::UsQwerty => US_QWERTY,
            Self::ThaiKedmanee => THAI_KEDMANEE,
        }
    }

    /// Canonical configuration name of the layout.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UsQwerty => "us-qwerty",
            Self::ThaiKedmanee => "thai-kedmanee",
        }
    }

    fn position(self, c: char) -> Option<usize> {
        self.keys().chars().position(|k| k == c)
    }

    fn key_at(self, position: usize) -> Option<char> {
        self.keys().chars().nth(position)
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyboardLayout {
    type Err = ChordsourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us-qwerty" | "qwerty" | "us" => Ok(Self::UsQwerty),
            "thai-kedmanee" | "kedmanee" | "th" => Ok(Self::ThaiKedmanee),
            other => Err(ChordsourceError::Config(format!(
                "unknown keyboard layout: {other}"
            ))),
        }
    }
}

/// Translates `text` as if it had been typed on `target` instead of `source`.
///
/// Pure and total: unmappable characters are kept as they are.
///
/// # Examples
///
/// ```
/// use chordsource::search::{remap, KeyboardLayout};
///
/// let fixed = remap(KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee, "iydgTv");
/// assert_eq!(fixed, "รักเธอ");
///
/// // Characters outside the source layout pass through.
/// assert_eq!(remap(KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee, "รัก 1"), "รัก ๅ");
/// ```
#[must_use]
pub fn remap(source: KeyboardLayout, target: KeyboardLayout, text: &str) -> String {
    text.chars()
        .map(|c| {
            source
                .position(c)
                .and_then(|position| target.key_at(position))
                .unwrap_or(c)
        })
        .collect()
}

/// Precomputed remapping for one configured layout pair.
///
/// Equivalent to calling [`remap`] with the pair, without rescanning the key
/// tables for every character.
#[derive(Debug, Clone)]
pub struct KeyboardRemapper {
    source: KeyboardLayout,
    target: KeyboardLayout,
    table: HashMap<char, char>,
}

impl KeyboardRemapper {
    #[must_use]
    pub fn new(source: KeyboardLayout, target: KeyboardLayout) -> Self {
        let table = source
            .keys()
            .chars()
            .zip(target.keys().chars())
            .filter(|(from, to)| from != to)
            .collect();
        Self {
            source,
            target,
            table,
        }
    }

    #[must_use]
    pub const fn source(&self) -> KeyboardLayout {
        self.source
    }

    #[must_use]
    pub const fn target(&self) -> KeyboardLayout {
        self.target
    }

    #[must_use]
    pub fn remap(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.table.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

impl Default for KeyboardRemapper {
    fn default() -> Self {
        Self::new(KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn layout_tables_cover_every_key_once() {
        for layout in [KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee] {
            let keys: Vec<char> = layout.keys().chars().collect();
            assert_eq!(keys.len(), KEY_COUNT, "{layout}");
            let unique: HashSet<char> = keys.iter().copied().collect();
            assert_eq!(unique.len(), KEY_COUNT, "{layout} has duplicate keys");
        }
    }

    #[test]
    fn qwerty_typing_becomes_thai() {
        assert_eq!(
            remap(KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee, "l;ylfu"),
            "สวัสดี"
        );
    }

    #[test]
    fn thai_typing_becomes_qwerty() {
        assert_eq!(
            remap(KeyboardLayout::ThaiKedmanee, KeyboardLayout::UsQwerty, "ะฟัสนพ"),
            "taylor"
        );
    }

    #[test]
    fn empty_and_unmappable_input_is_identity() {
        let r = |s: &str| remap(KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee, s);
        assert_eq!(r(""), "");
        assert_eq!(r("  \t\n"), "  \t\n");
        assert_eq!(r("🎸é"), "🎸é");
    }

    #[test]
    fn same_layout_is_identity() {
        let text = "Hello, world!";
        assert_eq!(remap(KeyboardLayout::UsQwerty, KeyboardLayout::UsQwerty, text), text);
    }

    #[test]
    fn precomputed_remapper_matches_pure_function() {
        let remapper = KeyboardRemapper::default();
        for text in ["iydgTv", "Bodyslam", "ไม่รู้", "a1!Z?", ""] {
            assert_eq!(
                remapper.remap(text),
                remap(KeyboardLayout::UsQwerty, KeyboardLayout::ThaiKedmanee, text)
            );
        }
    }

    #[test]
    fn layout_names_parse() {
        assert_eq!("US-QWERTY".parse::<KeyboardLayout>().unwrap(), KeyboardLayout::UsQwerty);
        assert_eq!("kedmanee".parse::<KeyboardLayout>().unwrap(), KeyboardLayout::ThaiKedmanee);
        assert!("dvorak".parse::<KeyboardLayout>().is_err());
    }
}
