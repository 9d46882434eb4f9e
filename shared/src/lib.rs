//! Shared types for the order server
//!
//! Domain models, the unified error/response envelope, and money helpers
//! used by the server crate and its API clients.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
