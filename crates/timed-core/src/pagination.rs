//! Pagination types for API responses

use serde::Deserialize;

/// Pagination parameters (from query string)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    100
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, 1000),
        }
    }

    /// Calculate the SQL offset
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.page_size
    }

    /// Calculate the SQL limit
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Query result with pagination metadata
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.page_size == 0 {
            1
        } else {
            (self.total + self.page_size - 1) / self.page_size
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}
