//! Authorization
//!
//! - [`Policy`] - role grants evaluated per request
//! - [`identify`] - reads the caller from trusted headers
//! - [`require`] - per-route capability check

pub mod middleware;
pub mod policy;

pub use middleware::{identify, require};
pub use policy::{Action, Decision, Policy, Resource, Role, Subject};
