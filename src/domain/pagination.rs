//! Page window and page-count arithmetic.
//!
//! All arithmetic is done in `u64` so that `page_size * page_number` cannot
//! overflow for any `u32` inputs.

use serde::Serialize;
use utoipa::ToSchema;

use super::filter_spec::keys;
use super::query_params::{Overrides, QueryParams, reconstruct};

/// Inclusive row range `[start, end]` for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationWindow {
    /// First row index (0-based, inclusive).
    pub start: u64,
    /// Last row index (0-based, inclusive).
    pub end: u64,
}

impl PaginationWindow {
    /// Window for `page_number` (1-indexed) at `page_size` rows per page.
    ///
    /// Callers pass values the normalizer already clamped to at least 1;
    /// zero is treated as 1 here as well.
    #[must_use]
    pub fn new(page_size: u32, page_number: u32) -> Self {
        let size = u64::from(page_size.max(1));
        let number = u64::from(page_number.max(1));
        let start = size * (number - 1);
        Self {
            start,
            end: start + size - 1,
        }
    }

    /// Number of rows the window covers.
    #[must_use]
    pub const fn row_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Pagination metadata derived from a window and the total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// Current page (1-indexed).
    pub page_number: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Rows matching the filters across all pages.
    pub total_count: u64,
    /// Number of pages (0 when there are no rows).
    pub total_pages: u64,
    /// Next page, or the current page when already on the last one.
    pub next_page: u64,
    /// Previous page, or the current page when already on the first one.
    pub prev_page: u64,
    /// 1-indexed position of the first shown row (0 when empty).
    pub shown_start: u64,
    /// 1-indexed position of the last shown row (0 when empty).
    pub shown_end: u64,
}

impl PageSummary {
    /// Derives page counts, neighbours, and the "showing X–Y of Z" range.
    #[must_use]
    pub fn derive(page_size: u32, page_number: u32, total_count: u64) -> Self {
        let window = PaginationWindow::new(page_size, page_number);
        let size = u64::from(page_size.max(1));
        let current = u64::from(page_number);
        let total_pages = total_count.div_ceil(size);

        Self {
            page_number,
            page_size,
            total_count,
            total_pages,
            next_page: if current < total_pages {
                current + 1
            } else {
                current
            },
            prev_page: if current > 1 { current - 1 } else { current },
            shown_start: total_count.min(window.start + 1),
            shown_end: total_count.min(window.end + 1),
        }
    }

    /// Page the "last" link points at; never below 1.
    #[must_use]
    pub fn last_page(&self) -> u64 {
        self.total_pages.max(1)
    }
}

/// Query strings for the first/previous/next/last pager links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLinks {
    /// Page 1.
    pub first: String,
    /// [`PageSummary::prev_page`].
    pub prev: String,
    /// [`PageSummary::next_page`].
    pub next: String,
    /// [`PageSummary::last_page`].
    pub last: String,
}

impl PageLinks {
    /// Builds the links by overriding `pageNumber` on `base`.
    #[must_use]
    pub fn new(base: &QueryParams, summary: &PageSummary) -> Self {
        let page = |n: u64| reconstruct(base, &Overrides::new().set(keys::PAGE_NUMBER, n));
        Self {
            first: page(1),
            prev: page(summary.prev_page),
            next: page(summary.next_page),
            last: page(summary.last_page()),
        }
    }
}
