//! Page-number pagination over in-memory collections.

/// Fixed page size of the admin post list.
pub const ADMIN_PAGE_SIZE: usize = 20;

/// Resolved page of a filtered collection.
///
/// `page` is always within `1..=total_pages`, and `total_pages` is at least
/// one even when there is nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn clamp(requested: usize, total_items: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = requested.clamp(1, total_pages);
        Self {
            page,
            total_pages,
            total_items,
            page_size,
        }
    }

    /// Index range of this page within the filtered collection.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_items);
        let end = (self.page * self.page_size).min(self.total_items);
        start..end
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_items_span_three_pages() {
        let window = PageWindow::clamp(3, 45, ADMIN_PAGE_SIZE);
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.range(), 40..45);
        assert!(!window.has_next());
        assert!(window.has_previous());
    }

    #[test]
    fn requests_past_the_end_clamp_to_last_page() {
        let window = PageWindow::clamp(4, 45, ADMIN_PAGE_SIZE);
        assert_eq!(window.page, 3);
        assert_eq!(window.range().len(), 5);
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let window = PageWindow::clamp(0, 45, ADMIN_PAGE_SIZE);
        assert_eq!(window.page, 1);
        assert_eq!(window.range(), 0..20);
    }

    #[test]
    fn empty_collection_reports_a_single_page() {
        let window = PageWindow::clamp(3, 0, ADMIN_PAGE_SIZE);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert!(window.range().is_empty());
        assert!(!window.is_paginated());
    }

    #[test]
    fn slice_borrows_the_page() {
        let items: Vec<u32> = (0..25).collect();
        let window = PageWindow::clamp(2, items.len(), ADMIN_PAGE_SIZE);
        assert_eq!(window.slice(&items), &[20, 21, 22, 23, 24]);
    }
}
