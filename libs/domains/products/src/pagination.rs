use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Page metadata returned alongside list results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    /// `ceil(total_items / limit)`; zero only when there are no items
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total_items: u64) -> Self {
        Self {
            page,
            limit,
            total_items,
            total_pages: total_items.div_ceil(limit.max(1)),
        }
    }
}

/// Rows to skip and fetch for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub take: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub take: u64,
    pub meta: PaginationMeta,
}

impl Pagination {
    /// The window for `page`, available before the total is known.
    pub fn window(page: u64, limit: u64) -> PageWindow {
        PageWindow {
            skip: page.saturating_sub(1).saturating_mul(limit),
            take: limit,
        }
    }
}

/// Pages past the end are reported as-is and simply select nothing.
pub fn paginate(page: u64, limit: u64, total_items: u64) -> Pagination {
    let PageWindow { skip, take } = Pagination::window(page, limit);
    Pagination {
        skip,
        take,
        meta: PaginationMeta::new(page, limit, total_items),
    }
}
