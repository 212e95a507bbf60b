//! Keyboard selection over a ranked result list.

use crate::search::{ListId, RankedResultList, SearchHit};

/// Tracks the active index into the most recently observed result list.
///
/// The index is always in `[0, len)` for a non-empty list and resets to `0`
/// whenever a list with a different identity is observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    list: Option<ListId>,
    len: usize,
    index: usize,
}

impl SelectionController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            list: None,
            len: 0,
            index: 0,
        }
    }

    /// Points the controller at `list`, resetting to the first hit if the
    /// list is a new one.
    pub fn observe(&mut self, list: &RankedResultList) {
        if self.list != Some(list.id()) {
            tracing::trace!(len = list.len(), "selection reset for new result list");
            self.list = Some(list.id());
            self.index = 0;
        }
        self.len = list.len();
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Advances circularly. No-op on an empty list.
    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = (self.index + 1) % self.len;
    }

    /// Retreats circularly. No-op on an empty list.
    pub fn prev(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = (self.index + self.len - 1) % self.len;
    }

    /// Resolves the hit under the cursor.
    ///
    /// Returns `None` when `list` is empty or is not the list this controller
    /// last observed.
    #[must_use]
    pub fn activate<'a>(&self, list: &'a RankedResultList) -> Option<&'a SearchHit> {
        if self.list != Some(list.id()) {
            return None;
        }
        list.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use crate::domain::CatalogRecord;
    use crate::search::QueryEngine;

    fn results(query: &str) -> RankedResultList {
        let snapshot = CatalogSnapshot::new(
            vec![
                CatalogRecord::new("1", "love story", "a", "u1"),
                CatalogRecord::new("2", "love me do", "b", "u2"),
                CatalogRecord::new("3", "lovely", "c", "u3"),
            ],
            None,
        );
        QueryEngine::default().search(query, &snapshot)
    }

    #[test]
    fn next_wraps_after_len_steps() {
        let list = results("love");
        assert_eq!(list.len(), 4);
        let mut selection = SelectionController::new();
        selection.observe(&list);
        selection.next();
        let start = selection.index();
        for _ in 0..list.len() {
            selection.next();
        }
        assert_eq!(selection.index(), start);
    }

    #[test]
    fn prev_from_first_goes_to_last() {
        let list = results("love");
        let mut selection = SelectionController::new();
        selection.observe(&list);
        selection.prev();
        assert_eq!(selection.index(), list.len() - 1);
        assert!(selection.activate(&list).is_some_and(SearchHit::is_fallback));
    }

    #[test]
    fn empty_list_ignores_navigation() {
        let list = results("");
        let mut selection = SelectionController::new();
        selection.observe(&list);
        selection.next();
        selection.prev();
        assert_eq!(selection.index(), 0);
        assert!(selection.activate(&list).is_none());
    }

    #[test]
    fn new_list_resets_selection() {
        let first = results("love");
        let mut selection = SelectionController::new();
        selection.observe(&first);
        selection.next();
        selection.next();

        selection.observe(&first);
        assert_eq!(selection.index(), 2);

        let second = results("love");
        selection.observe(&second);
        assert_eq!(selection.index(), 0);
        assert!(selection.activate(&first).is_none());
        assert_eq!(selection.activate(&second), second.get(0));
    }
}
