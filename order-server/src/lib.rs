//! Order Server - order management and reporting backend
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/          # config, shared state, HTTP server
//! ├── auth/          # role policy and per-route checks
//! ├── api/           # HTTP routes and handlers
//! ├── services/      # order and customer services
//! ├── reports/       # aggregate reports
//! ├── orders/        # status lifecycle
//! ├── db/            # SQLite pool and repositories
//! └── utils/         # errors, logging, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reports;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState, build_app};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};
