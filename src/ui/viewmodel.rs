//! View model types representing renderable UI state.
//!
//! View models are computed by [`AppState::compute_viewmodel`](crate::AppState::compute_viewmodel)
//! and consumed by the renderer. They carry display-ready data only.

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,

    /// Visible window of result rows.
    pub rows: Vec<ResultRow>,

    /// Index of the selected row within `rows`.
    pub selected_index: usize,

    pub status: Option<StatusLine>,
    pub footer: FooterInfo,
}

/// One result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub title: String,
    pub artist: String,
    pub badge: Option<SourceBadge>,
    pub is_selected: bool,

    /// The row opens a web search instead of a chord sheet.
    pub is_fallback: bool,
}

/// Chord sheet host, recognized by URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceBadge {
    Busk,
    Chordtabs,
}

impl SourceBadge {
    /// Recognizes the host of a chord sheet URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::ui::viewmodel::SourceBadge;
    ///
    /// assert_eq!(SourceBadge::from_url("https://busk.co/1"), Some(SourceBadge::Busk));
    /// assert_eq!(SourceBadge::from_url("https://www.dochord.com/1"), None);
    /// ```
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("https://busk") {
            Some(Self::Busk)
        } else if url.starts_with("https://chordtabs") {
            Some(Self::Chordtabs)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Busk => "busk",
            Self::Chordtabs => "chordtabs",
        }
    }
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// Number of records in the published catalog.
    pub record_count: usize,

    /// The last refresh failed and the catalog may be out of date.
    pub stale: bool,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
}

/// Line shown between the search bar and the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// The catalog is still downloading.
    Loading,
    Info,
}
