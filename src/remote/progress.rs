//! Download progress for the catalog fetch.

/// Status line shown while the latest catalog is loading.
pub const LOADING_MESSAGE: &str = "กำลังโหลดข้อมูลล่าสุด";

/// Bytes received so far, and the total when the server announced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    #[must_use]
    pub const fn new(loaded: u64, total: Option<u64>) -> Self {
        Self { loaded, total }
    }

    /// Rounded completion percentage, or `None` when the total is unknown.
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|t| *t > 0)?;
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.loaded.min(total) as f64 / total as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (ratio * 100.0).round() as u8;
        Some(percent)
    }

    /// Loading status text including the percentage when it is known.
    ///
    /// # Examples
    ///
    /// ```
    /// use chordsource::remote::LoadProgress;
    ///
    /// assert_eq!(LoadProgress::new(42, Some(100)).status_text(), "กำลังโหลดข้อมูลล่าสุด (42%)");
    /// assert_eq!(LoadProgress::new(42, None).status_text(), "กำลังโหลดข้อมูลล่าสุด");
    /// ```
    #[must_use]
    pub fn status_text(&self) -> String {
        self.percent().map_or_else(
            || LOADING_MESSAGE.to_string(),
            |percent| format!("{LOADING_MESSAGE} ({percent}%)"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(LoadProgress::new(150, Some(100)).percent(), Some(100));
        assert_eq!(LoadProgress::new(0, Some(0)).percent(), None);
        assert_eq!(LoadProgress::new(1, Some(3)).percent(), Some(33));
    }
}
