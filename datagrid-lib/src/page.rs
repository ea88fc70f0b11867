//! Client-side pagination of the display sequence.

use std::ops::Range;

use serde::Serialize;

use crate::error::ConfigError;

/// Page size choices offered by default.
pub const DEFAULT_PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Current page and page size. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Start on page 1 with the given page size.
    pub fn new(page_size: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self { page: 1, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go to a page. It is clamped on the next [`clamp`](Self::clamp).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Number of pages for `total_items`. At least 1.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Pull the current page back into range after the item count changed.
    pub fn clamp(&mut self, total_items: usize) {
        self.page = self.page.clamp(1, self.total_pages(total_items));
    }

    /// Index range of the current page within `total_items`.
    pub fn range(&self, total_items: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(total_items);
        let end = start.saturating_add(self.page_size).min(total_items);
        start..end
    }

    /// The current page of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    /// Summary of the current page for `total_items`.
    pub fn info(&self, total_items: usize) -> PageInfo {
        let range = self.range(total_items);
        PageInfo {
            current_page: self.page,
            total_pages: self.total_pages(total_items),
            page_size: self.page_size,
            total_items,
            start: range.start,
            end: range.end,
        }
    }
}

/// Where the current page sits in the display sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// First index on the page (inclusive).
    pub start: usize,
    /// Last index on the page (exclusive).
    pub end: usize,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Range label such as `"21-30 of 47"`.
    pub fn label(&self) -> String {
        if self.total_items == 0 {
            return "0 of 0".to_string();
        }
        format!("{}-{} of {}", self.start + 1, self.end, self.total_items)
    }
}
