//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness and database check (public)
//! - [`customers`] - customer management and customer metrics
//! - [`orders`] - order management, status transitions and order analytics
//! - [`reports`] - aggregate reports
//!
//! Every handler answers with the `ApiResponse { code, message, data }` envelope.

pub mod customers;
pub mod health;
pub mod orders;
pub mod reports;

use serde::Deserialize;

pub use crate::utils::{ApiResponse, AppError, AppResult};

/// Handler result: envelope on success, `AppError` otherwise
pub type ApiResult<T> = AppResult<ApiResponse<T>>;

/// `?q=` keyword query
#[derive(Debug, Deserialize)]
pub struct KeywordQuery {
    #[serde(default)]
    pub q: String,
}

/// `?limit=` query
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    pub fn or(&self, default: i64) -> i64 {
        self.limit.filter(|n| *n > 0).unwrap_or(default)
    }
}

/// Body carrying a list of ids
#[derive(Debug, Deserialize)]
pub struct IdsPayload {
    pub ids: Vec<i64>,
}

/// Parse a comma separated id list such as `1,2,3`
///
/// `None` or an empty string selects everything.
pub fn parse_ids(raw: Option<&str>) -> AppResult<Option<Vec<i64>>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| AppError::validation(format!("Invalid id: {}", part.trim())))
        })
        .collect::<AppResult<Vec<_>>>()
        .map(Some)
}
