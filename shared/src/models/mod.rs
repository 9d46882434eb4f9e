//! Data models
//!
//! Shared between the order server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod customer;
pub mod order;
pub mod pagination;
pub mod report;

// Re-exports
pub use customer::*;
pub use order::*;
pub use pagination::*;
pub use report::*;
