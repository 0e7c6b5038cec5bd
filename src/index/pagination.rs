//! Pagination math for the blog listing

use serde::Serialize;

/// A resolved page of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSlice {
    /// Current page, 1-indexed
    pub current: usize,
    /// Total number of pages, at least 1
    pub total_pages: usize,
    /// Items per page
    pub per_page: usize,
    /// Start index into the collection (inclusive)
    pub start: usize,
    /// End index into the collection (exclusive)
    pub end: usize,
}

impl PageSlice {
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }
}

/// Resolve page `requested` (1-indexed) of `total_items` items at `per_page`
/// items per page.
///
/// `total_pages` is `ceil(total_items / per_page)`, never less than 1 so an
/// empty collection still renders one (empty) index page. A requested page
/// outside `[1, total_pages]` is clamped rather than treated as an error.
pub fn paginate(total_items: usize, per_page: usize, requested: usize) -> PageSlice {
    let per_page = per_page.max(1);
    let total_pages = total_items.div_ceil(per_page).max(1);
    let current = requested.clamp(1, total_pages);

    let start = (current - 1) * per_page;
    let end = (start + per_page).min(total_items);

    PageSlice {
        current,
        total_pages,
        per_page,
        start,
        end,
    }
}
