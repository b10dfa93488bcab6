//! Row selection keyed by record identity.

use std::collections::HashSet;
use std::hash::Hash;

/// Tri-state of the select-all checkbox for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSelection {
    #[default]
    None,
    Some,
    All,
}

/// Tracks selected rows by their record keys.
///
/// Keys rather than row positions are stored, so re-sorting or reloading
/// never moves a selection onto a different record.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// Toggle selection for a key. Returns the new selected state.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Number of selected keys, including keys no longer on screen.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Tri-state for the given page of keys.
    pub fn page_state<'a>(&self, page: impl IntoIterator<Item = &'a K>) -> PageSelection
    where
        K: 'a,
    {
        let mut total = 0;
        let mut hits = 0;
        for key in page {
            total += 1;
            if self.selected.contains(key) {
                hits += 1;
            }
        }

        match hits {
            0 => PageSelection::None,
            n if n == total => PageSelection::All,
            _ => PageSelection::Some,
        }
    }

    /// Select every key of the page, or deselect them all when the whole
    /// page is already selected.
    pub fn toggle_page(&mut self, page: &[K]) {
        if page.is_empty() {
            return;
        }

        if self.page_state(page) == PageSelection::All {
            for key in page {
                self.selected.remove(key);
            }
        } else {
            self.selected.extend(page.iter().cloned());
        }
    }
}
