// ── Pagination cursor ──

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::policy;

/// Page sizes the dashboard offers.
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [5, 10, 25, 50, 100];

/// One entry of a page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLink {
    Page(u32),
    /// Elided run of pages ("…").
    Gap,
}

/// Pagination state of the current location page.
///
/// The server owns `total` and `total_pages`; every other field is
/// derived here so that `current_page ∈ [1, total_pages]` (when there is
/// at least one page) and the next/previous flags always agree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-indexed.
    pub current_page: u32,
    pub limit: u32,
    /// `(current_page - 1) * limit`.
    pub offset: u64,
    pub total: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// Records on the current page.
    pub result_count: u32,
}

impl Pagination {
    /// Cursor before anything has been loaded.
    pub fn first_page(limit: u32) -> Self {
        Self::from_server(1, limit, 0, 0, 0)
    }

    /// Build a consistent cursor from server-reported counts.
    ///
    /// `total_pages == 0` with a non-zero total is recomputed from the
    /// limit. A page beyond the last one is clamped.
    pub fn from_server(
        current_page: u32,
        limit: u32,
        total: u64,
        total_pages: u32,
        result_count: u32,
    ) -> Self {
        let limit = limit.max(1);
        let total_pages = if total_pages == 0 && total > 0 {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        } else {
            total_pages
        };

        let mut current_page = current_page.max(1);
        if total_pages >= 1 && current_page > total_pages {
            warn!(
                current_page,
                total_pages, "server reported a page past the end, clamping"
            );
            current_page = total_pages;
        }

        Self {
            current_page,
            limit,
            offset: u64::from(current_page - 1) * u64::from(limit),
            total,
            total_pages,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
            result_count,
        }
    }

    /// Whether `page` is a valid target for a page change.
    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }

    /// 1-based inclusive range of records on this page, `None` when empty.
    pub fn display_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let first = self.offset + 1;
        let last = (self.offset + u64::from(self.limit)).min(self.total);
        Some((first, last.max(first)))
    }

    /// Page-number strip around the current page.
    pub fn window(&self, radius: u32) -> Vec<PageLink> {
        policy::page_window(self.current_page, self.total_pages, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_page_is_empty() {
        let p = Pagination::first_page(10);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_previous_page);
        assert!(!p.contains_page(1));
        assert_eq!(p.display_range(), None);
    }

    #[test]
    fn flags_follow_current_page() {
        let p = Pagination::from_server(3, 10, 95, 10, 10);
        assert_eq!(p.offset, 20);
        assert!(p.has_next_page);
        assert!(p.has_previous_page);

        let last = Pagination::from_server(10, 10, 95, 10, 5);
        assert!(!last.has_next_page);
        assert_eq!(last.display_range(), Some((91, 95)));
    }

    #[test]
    fn missing_total_pages_is_derived() {
        let p = Pagination::from_server(1, 25, 51, 0, 25);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn page_past_end_is_clamped() {
        let p = Pagination::from_server(7, 10, 30, 3, 0);
        assert_eq!(p.current_page, 3);
        assert_eq!(p.offset, 20);
        assert!(!p.has_next_page);
    }

    #[test]
    fn contains_page_bounds() {
        let p = Pagination::from_server(1, 10, 30, 3, 10);
        assert!(!p.contains_page(0));
        assert!(p.contains_page(1));
        assert!(p.contains_page(3));
        assert!(!p.contains_page(4));
    }
}
