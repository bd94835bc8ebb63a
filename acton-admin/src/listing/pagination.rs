//! Offset based pagination

use serde::Serialize;

use super::QueryString;

/// Pagination state of a list page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Index of the first item on the page (0-based)
    pub offset: u64,
    /// Page size, never zero
    pub limit: u64,
    /// Total number of matching items
    pub total: u64,
}

impl Pagination {
    /// Create pagination state; a zero `limit` is treated as 1
    #[must_use]
    pub const fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit: if limit == 0 { 1 } else { limit },
            total,
        }
    }

    /// Current page number (1-based)
    #[must_use]
    pub const fn page(&self) -> u64 {
        (self.offset / self.limit).saturating_add(1)
    }

    /// Number of pages, at least 1
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    /// 1-based index of the first item shown, 0 when the page is empty
    #[must_use]
    pub const fn first_item(&self) -> u64 {
        if self.offset >= self.total {
            0
        } else {
            self.offset + 1
        }
    }

    /// 1-based index of the last item shown, 0 when the page is empty
    #[must_use]
    pub const fn last_item(&self) -> u64 {
        if self.offset >= self.total {
            0
        } else {
            let end = self.offset.saturating_add(self.limit);
            if end < self.total {
                end
            } else {
                self.total
            }
        }
    }

    /// Whether a previous page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Whether a next page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    /// Link to the previous page, keeping every other parameter
    #[must_use]
    pub fn previous_url(&self, path: &str, query: &QueryString) -> Option<String> {
        self.has_previous()
            .then(|| Self::page_url(path, query, self.offset.saturating_sub(self.limit)))
    }

    /// Link to the next page, keeping every other parameter
    #[must_use]
    pub fn next_url(&self, path: &str, query: &QueryString) -> Option<String> {
        self.has_next()
            .then(|| Self::page_url(path, query, self.offset + self.limit))
    }

    fn page_url(path: &str, query: &QueryString, offset: u64) -> String {
        let query = query.without("page");
        let query = if offset == 0 {
            query.without("offset")
        } else {
            query.with("offset", offset.to_string())
        };
        query.to_url(path)
    }
}
