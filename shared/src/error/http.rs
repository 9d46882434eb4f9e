//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidOrderStatus | Self::InvalidOrderTotal => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound | Self::CustomerNotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::PhoneAlreadyExists | Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidStatusTransition => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError | Self::DatabaseError | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_codes() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InvalidStatusTransition.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorCode::InvalidOrderStatus.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidOrderTotal.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_customer_codes() {
        assert_eq!(ErrorCode::CustomerNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PhoneAlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::EmailAlreadyExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_caller_codes() {
        assert_eq!(ErrorCode::NotAuthenticated.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_system_codes_are_server_errors() {
        for code in ErrorCode::ALL {
            assert_eq!(code.http_status().is_server_error(), code.code() >= 9000, "{code}");
        }
    }
}
