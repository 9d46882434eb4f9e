//! Service-layer error type
//!
//! `ServiceError` sits between repository errors (`RepoError`) and the API
//! error (`AppError`), so services can use `?` on both repository calls and
//! lifecycle transitions.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{InvalidOrderStatus, OrderStatus};
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::orders::TransitionError;
use crate::utils::validation::InvalidField;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Customer {0} not found")]
    CustomerNotFound(i64),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Status string outside the order status set
    #[error("{0}")]
    InvalidStatus(String),

    /// Order total that is not a positive amount of at least one cent
    #[error("{0}")]
    InvalidTotal(String),

    #[error("Phone number already registered: {0}")]
    DuplicatePhone(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Storage failure; the message is logged, never returned to clients
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => ServiceError::NotFound(msg),
            RepoError::Duplicate(field) if field == "phone" => {
                ServiceError::DuplicatePhone("phone already in use".into())
            }
            RepoError::Duplicate(field) if field == "email" => {
                ServiceError::DuplicateEmail("email already in use".into())
            }
            RepoError::Duplicate(msg) => ServiceError::Validation(msg),
            RepoError::Validation(msg) => ServiceError::Validation(msg),
            RepoError::Database(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidTransition { from, to } => ServiceError::InvalidTransition { from, to },
        }
    }
}

impl From<InvalidField> for ServiceError {
    fn from(err: InvalidField) -> Self {
        ServiceError::Validation(err.0)
    }
}

impl From<InvalidOrderStatus> for ServiceError {
    fn from(err: InvalidOrderStatus) -> Self {
        ServiceError::InvalidStatus(err.to_string())
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::NotFound => ServiceError::NotFound(err.message),
            _ => ServiceError::Validation(err.message),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::OrderNotFound(id) => AppError::order_not_found(id),
            ServiceError::CustomerNotFound(id) => AppError::customer_not_found(id),
            ServiceError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ServiceError::Validation(msg) => AppError::validation(msg),
            ServiceError::InvalidStatus(msg) => AppError::with_message(ErrorCode::InvalidOrderStatus, msg),
            ServiceError::InvalidTotal(msg) => AppError::with_message(ErrorCode::InvalidOrderTotal, msg),
            ServiceError::DuplicatePhone(msg) => AppError::with_message(ErrorCode::PhoneAlreadyExists, msg),
            ServiceError::DuplicateEmail(msg) => AppError::with_message(ErrorCode::EmailAlreadyExists, msg),
            ServiceError::InvalidTransition { from, to } => AppError::invalid_transition(from.as_str(), to.as_str()),
            ServiceError::Storage(msg) => {
                tracing::error!(error = %msg, "Service storage error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
