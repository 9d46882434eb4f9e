//! Error codes returned in the `code` field of every API response
//!
//! The leading digit is the domain (see [`super::ErrorCategory`]):
//! 0 general, 1 auth, 2 permission, 3 customer, 4 order, 9 system.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx
    Success = 0,
    ValidationFailed = 2,
    NotFound = 3,

    // 1xxx
    /// No usable caller identity on the request
    NotAuthenticated = 1001,

    // 2xxx
    PermissionDenied = 2001,

    // 3xxx
    CustomerNotFound = 3001,
    /// Phone number registered to another customer
    PhoneAlreadyExists = 3002,
    /// Email registered to another customer
    EmailAlreadyExists = 3003,

    // 4xxx
    OrderNotFound = 4001,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4002,
    /// Status string outside pending, paid, delivered, canceled
    InvalidOrderStatus = 4003,
    /// Total below one cent, negative or not a number
    InvalidOrderTotal = 4004,

    // 9xxx
    InternalError = 9001,
    DatabaseError = 9002,
    ConfigError = 9005,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 15] = [
        ErrorCode::Success,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::NotAuthenticated,
        ErrorCode::PermissionDenied,
        ErrorCode::CustomerNotFound,
        ErrorCode::PhoneAlreadyExists,
        ErrorCode::EmailAlreadyExists,
        ErrorCode::OrderNotFound,
        ErrorCode::InvalidStatusTransition,
        ErrorCode::InvalidOrderStatus,
        ErrorCode::InvalidOrderTotal,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Message used when an error carries no custom text
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::PhoneAlreadyExists => "Phone number already registered",
            ErrorCode::EmailAlreadyExists => "Email already registered",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidStatusTransition => "Invalid order status transition",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidOrderTotal => "Order total must be at least 0.01",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not one of the [`ErrorCode`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_u16() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::InvalidOrderStatus.code(), 4003);
        assert_eq!(ErrorCode::InvalidOrderTotal.code(), 4004);
    }

    #[test]
    fn test_all_is_sorted_and_unique() {
        let values: Vec<u16> = ErrorCode::ALL.iter().map(ErrorCode::code).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unknown_number_is_rejected() {
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
        assert_eq!(ErrorCode::try_from(4005), Err(InvalidErrorCode(4005)));
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::OrderNotFound).unwrap(), "4001");
        let code: ErrorCode = serde_json::from_str("3003").unwrap();
        assert_eq!(code, ErrorCode::EmailAlreadyExists);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
