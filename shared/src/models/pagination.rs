//! Page-based listing

use serde::{Deserialize, Serialize};

/// Page query parameters (1-based page)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// One page of results with paging metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, current_page: u32, per_page: u32) -> Self {
        let last_page = if per_page > 0 && total > 0 {
            (total as u64).div_ceil(per_page as u64) as u32
        } else {
            1
        };
        Self {
            data,
            total,
            current_page,
            per_page,
            last_page,
        }
    }
}
