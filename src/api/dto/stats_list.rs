//! DTOs for the paginated mapping list.

use serde::{Deserialize, Serialize};

use super::stats::StatsResponse;

/// One page of mapping statistics, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<StatsResponse>,
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = (total_items.max(0) as u64).div_ceil(page_size.max(1) as u64) as u32;

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
