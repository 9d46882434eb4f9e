//! Services
//!
//! Stateless facades over the repositories. Each service holds the pool and
//! the business clock and is cheap to build per request from `ServerState`.

pub mod customers;
pub mod error;
pub mod orders;

pub use customers::CustomerService;
pub use error::{ServiceError, ServiceResult};
pub use orders::OrderService;
