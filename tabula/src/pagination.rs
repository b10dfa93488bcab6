//! Pagination state and page-button window.

use std::ops::Range;

/// Page sizes offered by the page-size picker.
pub const PAGE_SIZE_OPTIONS: [usize; 6] = [5, 10, 20, 30, 40, 50];

/// Maximum number of numbered page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

/// Current page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page, never zero.
    pub page_size: usize,
}

impl Pagination {
    /// Start on the first page with the given size.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// `ceil(total / page_size)`.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Pull the page index back onto the last page when `total` shrank.
    /// Returns `true` if the index moved.
    pub fn clamp(&mut self, total: usize) -> bool {
        let last = self.page_count(total).saturating_sub(1);
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    /// Row range of the current page within `total` rows.
    pub fn bounds(&self, total: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// Move to `index` if it exists. Out-of-range requests are rejected.
    pub fn goto(&mut self, index: usize, total: usize) -> bool {
        if index >= self.page_count(total) || index == self.page_index {
            return false;
        }
        self.page_index = index;
        true
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 || page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page_index = 0;
        true
    }
}

/// Page indices for the numbered buttons: up to [`PAGE_WINDOW`] pages
/// centred on `current`, shifted to stay inside `0..page_count`.
pub fn page_window(current: usize, page_count: usize) -> Range<usize> {
    let half = PAGE_WINDOW / 2;
    let end = (current.saturating_sub(half) + PAGE_WINDOW).min(page_count);
    let start = end.saturating_sub(PAGE_WINDOW);
    start..end
}

/// Picker options, with `current` merged in when it is not a preset.
pub fn page_size_options(current: usize) -> Vec<usize> {
    let mut options = PAGE_SIZE_OPTIONS.to_vec();
    if !options.contains(&current) {
        options.push(current);
        options.sort_unstable();
    }
    options
}
