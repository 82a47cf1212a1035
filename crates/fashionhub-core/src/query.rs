//! # Product Query Parameters and Pages
//!
//! `ProductQuery` describes one product-list read; `ProductPage` is its
//! result. Both are plain values: the REST client turns a query into URL
//! parameters, the query cache turns it into a cache key.
//!
//! ## Pagination Math
//! ```text
//! page=2, limit=12, total=30
//!
//!   offset      = (page - 1) * limit      = 12
//!   total_pages = ceil(total / limit)     = 3
//!
//! no page/limit, total=30
//!
//!   page = 1, limit = 30, total_pages = 1   (0 when total = 0)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

// =============================================================================
// Product Query
// =============================================================================

/// Parameters of a product-list read.
///
/// Empty and whitespace-only strings mean "no filter"; see [`normalized`].
///
/// [`normalized`]: ProductQuery::normalized
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Trims text filters and drops the empty ones.
    ///
    /// Two queries that normalize equal request the same data.
    ///
    /// ```rust
    /// use fashionhub_core::ProductQuery;
    ///
    /// let raw = ProductQuery::new().search("  shirt ").category("   ");
    /// let q = raw.normalized();
    /// assert_eq!(q.search.as_deref(), Some("shirt"));
    /// assert_eq!(q.category, None);
    /// ```
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        ProductQuery {
            search: clean(&self.search),
            category: clean(&self.category),
            page: self.page,
            limit: self.limit,
        }
    }

    /// `(page, limit)` when both are present and usable.
    ///
    /// Page numbers start at 1; a page of 0 is read as page 1. A limit of 0
    /// disables pagination.
    pub fn pagination(&self) -> Option<(u32, u32)> {
        match (self.page, self.limit) {
            (Some(page), Some(limit)) if limit > 0 => Some((page.max(1), limit)),
            _ => None,
        }
    }

    /// Row offset of the requested page.
    pub fn offset(&self) -> Option<u64> {
        self.pagination()
            .map(|(page, limit)| u64::from(page - 1) * u64::from(limit))
    }
}

// =============================================================================
// Product Page
// =============================================================================

/// One page of products, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u64,
    pub total_pages: u64,
}

impl ProductPage {
    /// Builds a page for `query` given the rows and the store's total count.
    ///
    /// Without pagination the page covers every row: `page = 1`,
    /// `limit = total`.
    pub fn new(data: Vec<Product>, total: u64, query: &ProductQuery) -> Self {
        match query.pagination() {
            Some((page, limit)) => ProductPage {
                data,
                total,
                page,
                limit: u64::from(limit),
                total_pages: total_pages(total, u64::from(limit)),
            },
            None => ProductPage {
                data,
                total,
                page: 1,
                limit: total,
                total_pages: total_pages(total, total),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// `ceil(total / limit)`, with 0 pages for an empty result.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if total == 0 || limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_second_page() {
        let query = ProductQuery::new().page(2, 12);
        assert_eq!(query.offset(), Some(12));
        assert_eq!(ProductQuery::new().offset(), None);
    }

    #[test]
    fn test_page_zero_reads_as_first_page() {
        let query = ProductQuery::new().page(0, 10);
        assert_eq!(query.pagination(), Some((1, 10)));
        assert_eq!(query.offset(), Some(0));
    }

    #[test]
    fn test_limit_without_page_is_unpaginated() {
        let query = ProductQuery {
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(query.pagination(), None);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(30, 12), 3);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(0, 12), 0);
    }

    #[test]
    fn test_unpaginated_page_covers_everything() {
        let page = ProductPage::new(Vec::new(), 5, &ProductQuery::new());
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 5);
        assert_eq!(page.total_pages, 1);

        let empty = ProductPage::new(Vec::new(), 0, &ProductQuery::new());
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_paginated_page_navigation() {
        let page = ProductPage::new(Vec::new(), 30, &ProductQuery::new().page(2, 12));
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_normalized_queries_compare_equal() {
        let a = ProductQuery::new().search(" shirt").category("");
        let b = ProductQuery::new().search("shirt ");
        assert_eq!(a.normalized(), b.normalized());
    }
}
