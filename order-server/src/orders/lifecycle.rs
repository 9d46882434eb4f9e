//! Order lifecycle
//!
//! Guarded status transitions over the table in [`OrderStatus::allowed_transitions`]:
//!
//! ```text
//! pending   -> paid, canceled
//! paid      -> delivered, canceled
//! delivered -> (terminal)
//! canceled  -> (terminal)
//! ```

use shared::models::OrderStatus;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

/// A named business action that moves an order forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pay,
    Deliver,
    Cancel,
}

impl Transition {
    /// Status this transition leads to
    pub fn target(&self) -> OrderStatus {
        match self {
            Transition::Pay => OrderStatus::Paid,
            Transition::Deliver => OrderStatus::Delivered,
            Transition::Cancel => OrderStatus::Canceled,
        }
    }

    /// Next status from `current`, or `InvalidTransition`
    pub fn apply(&self, current: OrderStatus) -> Result<OrderStatus, TransitionError> {
        let next = self.target();
        if current.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::InvalidTransition { from: current, to: next })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Pay => "pay",
            Transition::Deliver => "deliver",
            Transition::Cancel => "cancel",
        }
    }
}

/// Check a status change without applying it
pub fn validate_transition(current: OrderStatus, next: OrderStatus) -> bool {
    current.can_transition_to(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pay() {
        assert_eq!(Transition::Pay.apply(OrderStatus::Pending), Ok(OrderStatus::Paid));
        for from in [OrderStatus::Paid, OrderStatus::Delivered, OrderStatus::Canceled] {
            assert_eq!(
                Transition::Pay.apply(from),
                Err(TransitionError::InvalidTransition { from, to: OrderStatus::Paid })
            );
        }
    }

    #[test]
    fn test_deliver_requires_payment() {
        assert_eq!(Transition::Deliver.apply(OrderStatus::Paid), Ok(OrderStatus::Delivered));
        assert!(Transition::Deliver.apply(OrderStatus::Pending).is_err());
        assert!(Transition::Deliver.apply(OrderStatus::Delivered).is_err());
        assert!(Transition::Deliver.apply(OrderStatus::Canceled).is_err());
    }

    #[test]
    fn test_cancel() {
        assert_eq!(Transition::Cancel.apply(OrderStatus::Pending), Ok(OrderStatus::Canceled));
        assert_eq!(Transition::Cancel.apply(OrderStatus::Paid), Ok(OrderStatus::Canceled));
        assert!(Transition::Cancel.apply(OrderStatus::Delivered).is_err());
        assert!(Transition::Cancel.apply(OrderStatus::Canceled).is_err());
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for from in [OrderStatus::Delivered, OrderStatus::Canceled] {
            for transition in [Transition::Pay, Transition::Deliver, Transition::Cancel] {
                assert!(transition.apply(from).is_err());
            }
        }
    }

    #[test]
    fn test_validate_transition() {
        assert!(validate_transition(OrderStatus::Pending, OrderStatus::Paid));
        assert!(!validate_transition(OrderStatus::Pending, OrderStatus::Delivered));
        assert!(!validate_transition(OrderStatus::Paid, OrderStatus::Paid));
    }

    #[test]
    fn test_error_message() {
        let err = Transition::Pay.apply(OrderStatus::Delivered).unwrap_err();
        assert_eq!(err.to_string(), "Cannot change order status from delivered to paid");
    }
}
