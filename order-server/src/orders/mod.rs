//! Order domain logic

pub mod lifecycle;

pub use lifecycle::{Transition, TransitionError, validate_transition};
