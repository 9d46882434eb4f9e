//! Server state
//!
//! Shared, cheaply clonable handle passed to every handler.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::Policy;
use crate::core::Config;
use crate::db::DbService;
use crate::reports::ReportEngine;
use crate::services::{CustomerService, OrderService};
use crate::utils::AppResult;
use crate::utils::time::Clock;

/// Server state
///
/// | Field | Meaning |
/// |-------|---------|
/// | pool | SQLite connection pool |
/// | config | Immutable configuration |
/// | clock | Business timezone (and frozen instant in tests) |
/// | policy | Authorization grants |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub clock: Clock,
    pub policy: Arc<Policy>,
}

impl ServerState {
    pub fn new(pool: SqlitePool, config: Config, clock: Clock) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            clock,
            policy: Arc::new(Policy::default()),
        }
    }

    /// Open the configured database, run migrations and build the state
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        let clock = Clock::system(config.timezone);
        tracing::info!(timezone = %config.timezone, environment = %config.environment, "Server state initialized");
        Ok(Self::new(db.pool, config, clock))
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.pool.clone(), self.clock)
    }

    pub fn customer_service(&self) -> CustomerService {
        CustomerService::new(self.pool.clone(), self.clock)
    }

    pub fn report_engine(&self) -> ReportEngine {
        ReportEngine::new(self.pool.clone(), self.clock)
    }

    /// Page size for a listing, falling back to the configured default
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        page_size_or(requested, self.config.default_page_size)
    }
}

/// Largest page a listing returns
pub const MAX_PAGE_SIZE: u32 = 100;

/// `requested` when positive, else `default`; capped at [`MAX_PAGE_SIZE`]
pub fn page_size_or(requested: Option<u32>, default: u32) -> u32 {
    requested.filter(|n| *n > 0).unwrap_or(default).min(MAX_PAGE_SIZE)
}
