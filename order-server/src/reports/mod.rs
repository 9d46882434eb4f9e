//! Reporting
//!
//! Aggregate views over orders and customers, computed on demand.

pub mod engine;

pub use engine::{DEFAULT_TREND_LIMIT, ReportEngine};
