//! Page windows and paginated results shared by the listing queries.

use serde::{Deserialize, Serialize};

/// Page size used when a listing query does not specify one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Requested page window.
///
/// The window is not validated on construction: a zero page or page size is
/// rejected by the repository that executes the query, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Creates a window for the one-based `page` holding `per_page` items.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(self) -> u32 {
        self.per_page
    }

    /// Returns `true` when both the page number and page size are positive.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.page > 0 && self.per_page > 0
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of a listing together with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on the current page.
    pub items: Vec<T>,
    /// Number of rows matching the query across all pages.
    pub total: u64,
    /// Requested page size.
    pub per_page: u32,
    /// One-based page number.
    pub page: u32,
}

impl<T> Page<T> {
    /// Assembles a page from its items, the overall total and the window.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            per_page: request.per_page,
            page: request.page,
        }
    }

    /// Returns the number of the last non-empty page, or 1 for an empty
    /// listing.
    #[must_use]
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.per_page)).max(1)
    }

    /// Returns `true` when pages follow the current one.
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        u64::from(self.page) < self.last_page()
    }
}
