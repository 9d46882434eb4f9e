//! `AppError` and the response envelope
//!
//! Every response body has the shape `{code, message, data?, details?}`;
//! `code` is 0 on success and an [`ErrorCode`] otherwise.

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by handlers
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Structured context, e.g. `{"from": "pending", "to": "delivered"}`
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn order_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")).with_detail("order_id", id)
    }

    pub fn customer_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::CustomerNotFound, format!("Customer {id} not found"))
            .with_detail("customer_id", id)
    }

    /// Rejected lifecycle step; both statuses are echoed in `details`
    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change order status from {from} to {to}"),
        )
        .with_detail("from", from)
        .with_detail("to", to)
    }
}

/// Response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message(ErrorCode::Success.message(), data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload (deletes)
    pub fn ok() -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: ErrorCode::Success.message().to_string(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (self.http_status(), Json(ApiResponse::<()>::error(&self))).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = match self.code.map(ErrorCode::try_from) {
            None => StatusCode::OK,
            Some(Ok(code)) => code.http_status(),
            Some(Err(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message() {
        let err = AppError::new(ErrorCode::InvalidOrderTotal);
        assert_eq!(err.message, "Order total must be at least 0.01");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_not_found_constructors() {
        let err = AppError::order_not_found(12);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.to_string(), "Order 12 not found");
        assert_eq!(err.details.unwrap()["order_id"], 12);

        let err = AppError::customer_not_found(7);
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_transition_details() {
        let err = AppError::invalid_transition("delivered", "paid");
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        let details = err.details.unwrap();
        assert_eq!(details["from"], "delivered");
        assert_eq!(details["to"], "paid");
    }

    #[test]
    fn test_envelope_shapes() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "code": 0, "message": "OK", "data": [1, 2] }));

        let json = serde_json::to_value(ApiResponse::<()>::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "code": 0, "message": "OK" }));

        let err = AppError::with_message(ErrorCode::PhoneAlreadyExists, "Phone number already registered")
            .with_detail("phone", "0812");
        let json = serde_json::to_value(ApiResponse::<()>::error(&err)).unwrap();
        assert_eq!(json["code"], 3002);
        assert_eq!(json["details"]["phone"], "0812");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_response_status_follows_code() {
        let response = ApiResponse::<()>::error(&AppError::customer_not_found(1)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = ApiResponse::success("x").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let response = AppError::not_authenticated().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
