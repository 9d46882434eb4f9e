//! Core - configuration, shared state and the HTTP server
//!
//! - [`Config`] - environment driven settings
//! - [`ServerState`] - state shared by every handler
//! - [`Server`] - listener

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app, build_router};
pub use state::{MAX_PAGE_SIZE, ServerState, page_size_or};
