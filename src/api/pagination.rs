//! Pagination utilities for list views

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::lenient;

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    pub page: Option<u32>,

    /// Items per page
    pub per_page: Option<u32>,
}

impl PaginationParams {
    /// Maximum allowed items per page
    pub const MAX_PER_PAGE: u32 = 100;

    /// Returns the clamped per_page value
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, Self::MAX_PER_PAGE)
    }

    /// Returns the page (1-indexed, minimum 1)
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Pagination block as sent by the marketplace backend. Every field is
/// optional because different endpoints fill in different subsets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default, alias = "currentPage", deserialize_with = "lenient::count")]
    pub page: Option<u64>,

    #[serde(default, alias = "perPage", alias = "limit", deserialize_with = "lenient::count")]
    pub per_page: Option<u64>,

    #[serde(default, alias = "totalItems", alias = "total_items", deserialize_with = "lenient::count")]
    pub total: Option<u64>,

    #[serde(default, alias = "totalPages", deserialize_with = "lenient::count")]
    pub total_pages: Option<u64>,

    #[serde(default, alias = "hasNext", alias = "hasNextPage")]
    pub has_next: Option<bool>,

    #[serde(default, alias = "hasPrev", alias = "hasPrevPage", alias = "hasPrevious")]
    pub has_prev: Option<bool>,
}

/// Width of the numbered page window.
const PAGE_WINDOW: u64 = 5;

/// Pagination state for the list footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub page: u64,
    pub per_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub label: String,
    pub page_numbers: Vec<u64>,
}

impl PaginationControls {
    /// Builds controls from the backend's page block, falling back to the
    /// requested params for anything it left out. Explicit `hasNext` /
    /// `hasPrev` flags win over values derived from the page count.
    pub fn from_page_info(info: &PageInfo, requested: &PaginationParams) -> Self {
        let page = info.page.unwrap_or(u64::from(requested.page())).max(1);
        let per_page = info
            .per_page
            .filter(|n| *n > 0)
            .unwrap_or(u64::from(requested.per_page()));
        let total_pages = info
            .total_pages
            .or_else(|| info.total.map(|total| total.div_ceil(per_page)));

        let has_next = info
            .has_next
            .unwrap_or_else(|| total_pages.is_some_and(|pages| page < pages));
        let has_prev = info.has_prev.unwrap_or(page > 1);

        let label = match total_pages {
            Some(pages) => format!("Page {} of {}", page, pages.max(1)),
            None => format!("Page {page}"),
        };

        Self {
            page,
            per_page,
            total_items: info.total,
            total_pages,
            prev_disabled: !has_prev,
            next_disabled: !has_next,
            label,
            page_numbers: page_window(page, total_pages),
        }
    }
}

/// Up to [`PAGE_WINDOW`] page numbers centred on `page`, shifted to stay
/// within `1..=total_pages` when it is known.
fn page_window(page: u64, total_pages: Option<u64>) -> Vec<u64> {
    let half = PAGE_WINDOW / 2;

    let (start, end) = match total_pages {
        Some(total) => {
            let total = total.max(1);
            let start = page.min(total).saturating_sub(half).max(1);
            match start.checked_add(PAGE_WINDOW - 1) {
                Some(end) if end <= total => (start, end),
                _ => (total.saturating_sub(PAGE_WINDOW - 1).max(1), total),
            }
        }
        // Unknown page count: never promise pages past the current one
        None => (page.saturating_sub(half).max(1), page),
    };

    (start..=end).collect()
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationControls,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: PaginationControls) -> Self {
        Self { data, pagination }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
