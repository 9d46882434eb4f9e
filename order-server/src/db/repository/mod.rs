//! Repository Module
//!
//! Free-function data access over the SQLite pool. Each function takes the
//! pool (or an open transaction) and returns `RepoResult`.

pub mod customer;
pub mod order;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if !db_err.is_unique_violation() {
                return RepoError::Database(err.to_string());
            }
            // SQLite: "UNIQUE constraint failed: customers.phone"
            let message = db_err.message();
            if message.contains("customers.phone") {
                return RepoError::Duplicate("phone".into());
            }
            if message.contains("customers.email") {
                return RepoError::Duplicate("email".into());
            }
            return RepoError::Duplicate(message.to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// `?,?,?` for a dynamic `IN (...)` list
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Offset for a 1-based page number, saturating for pages past the end
pub(crate) fn page_offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.max(1) - 1).saturating_mul(i64::from(per_page))
}
