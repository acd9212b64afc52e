//! # Pagination
//!
//! Page numbers are 1-based. An empty view still has one (empty) page.

use std::ops::{Range, RangeInclusive};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum number of numbered page buttons.
pub const WINDOW: usize = 5;

/// `ceil(rows / page_size)`, never less than 1.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    rows.div_ceil(page_size).max(1)
}

/// Clamp `page` into `[1, total]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Row range of `page`, after clamping it to the existing pages.
pub fn page_range(page: usize, page_size: usize, rows: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let page = clamp_page(page, page_count(rows, page_size));
    let start = (page - 1) * page_size;
    start.min(rows)..(start + page_size).min(rows)
}

/// Up to [`WINDOW`] page numbers centred on `current`, shifted to stay
/// inside `[1, total]` near either end.
pub fn page_window(current: usize, total: usize) -> RangeInclusive<usize> {
    let total = total.max(1);
    let span = WINDOW - 1;
    let start = current.saturating_sub(2).max(1);
    let end = (start + span).min(total);
    let start = end.saturating_sub(span).max(1);
    start..=end
}

/// Targets of every control in the pagination strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub current: usize,
    pub total: usize,
    pub first: usize,
    pub prev: usize,
    pub window: RangeInclusive<usize>,
    pub next: usize,
    pub last: usize,
}

impl Controls {
    pub fn new(current: usize, total: usize) -> Self {
        let total = total.max(1);
        let current = clamp_page(current, total);
        Self {
            current,
            total,
            first: 1,
            prev: current.saturating_sub(1).max(1),
            window: page_window(current, total),
            next: (current + 1).min(total),
            last: total,
        }
    }

    /// Every page, for the jump-to-page selector.
    pub fn jump_targets(&self) -> RangeInclusive<usize> {
        1..=self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(current: usize, total: usize) -> Vec<usize> {
        page_window(current, total).collect()
    }

    #[test]
    fn empty_view_has_one_page() {
        assert_eq!(page_count(0, 10), 1);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(200, 10), 20);
    }

    #[test]
    fn windows_for_twenty_pages() {
        assert_eq!(window(1, 20), vec![1, 2, 3, 4, 5]);
        assert_eq!(window(20, 20), vec![16, 17, 18, 19, 20]);
        assert_eq!(window(10, 20), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn window_near_edges() {
        assert_eq!(window(2, 20), vec![1, 2, 3, 4, 5]);
        assert_eq!(window(19, 20), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn window_shorter_than_five_pages() {
        assert_eq!(window(1, 1), vec![1]);
        assert_eq!(window(2, 3), vec![1, 2, 3]);
    }

    #[test]
    fn page_range_slices_rows() {
        assert_eq!(page_range(1, 10, 25), 0..10);
        assert_eq!(page_range(3, 10, 25), 20..25);
        assert_eq!(page_range(1, 10, 0), 0..0);
    }

    #[test]
    fn page_range_clamps_out_of_range_pages() {
        assert_eq!(page_range(9, 10, 25), 20..25);
        assert_eq!(page_range(0, 10, 25), 0..10);
    }

    #[test]
    fn controls_clamp_prev_and_next() {
        let c = Controls::new(1, 20);
        assert_eq!((c.first, c.prev, c.next, c.last), (1, 1, 2, 20));
        let c = Controls::new(20, 20);
        assert_eq!((c.prev, c.next), (19, 20));
        assert_eq!(c.jump_targets().count(), 20);
    }

    #[test]
    fn controls_clamp_current() {
        let c = Controls::new(50, 3);
        assert_eq!(c.current, 3);
        assert_eq!(c.window, 1..=3);
    }
}
