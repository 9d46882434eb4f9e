//! Authorization middleware
//!
//! The caller is authenticated upstream and arrives as two trusted headers:
//! `x-user-id` and `x-user-role`. [`identify`] turns them into a [`Subject`]
//! stored in the request extensions; [`require`] checks one capability
//! against the [`Policy`].

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::policy::{Action, Policy, Resource, Subject};
use crate::core::ServerState;
use crate::utils::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

const PUBLIC_HEALTH_PATH: &str = "/api/health";

/// Read the subject from the trusted headers
///
/// `Ok(None)` when neither header is present.
pub fn subject_from_headers(headers: &HeaderMap) -> Result<Option<Subject>, AppError> {
    let id = headers.get(USER_ID_HEADER).and_then(|h| h.to_str().ok());
    let role = headers.get(USER_ROLE_HEADER).and_then(|h| h.to_str().ok());

    match (id, role) {
        (None, None) => Ok(None),
        (Some(id), Some(role)) => {
            let id = id
                .trim()
                .parse::<i64>()
                .map_err(|_| AppError::not_authenticated().with_detail("header", USER_ID_HEADER))?;
            let role = role
                .parse()
                .map_err(|_| AppError::not_authenticated().with_detail("header", USER_ROLE_HEADER))?;
            Ok(Some(Subject { id, role }))
        }
        _ => Err(AppError::not_authenticated()),
    }
}

/// Attach the caller identity and the policy to API requests
///
/// Skips CORS preflight, non-API paths and the health check. Malformed
/// identity headers are rejected with 401; absent headers are left for
/// [`require`] to reject.
pub async fn identify(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, AppError> {
    let path = req.uri().path();
    if req.method() == http::Method::OPTIONS || !path.starts_with("/api/") || path == PUBLIC_HEALTH_PATH {
        return Ok(next.run(req).await);
    }

    match subject_from_headers(req.headers()) {
        Ok(Some(subject)) => {
            req.extensions_mut().insert(subject);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(uri = %req.uri(), "Rejected malformed identity headers");
            return Err(e);
        }
    }
    req.extensions_mut().insert(state.policy.clone());
    Ok(next.run(req).await)
}

/// Require `action` on `resource`
///
/// ```ignore
/// Router::new()
///     .route("/", delete(handler::delete))
///     .layer(middleware::from_fn(require(Action::Delete, Resource::Orders)));
/// ```
///
/// No subject ⇒ 401, denied ⇒ 403.
pub fn require(
    action: Action,
    resource: Resource,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let subject = req
                .extensions()
                .get::<Subject>()
                .cloned()
                .ok_or_else(AppError::not_authenticated)?;
            let policy = req
                .extensions()
                .get::<Arc<Policy>>()
                .cloned()
                .ok_or_else(|| AppError::internal("Authorization policy not installed"))?;

            if !policy.authorize(&subject, action, resource).is_allowed() {
                tracing::warn!(
                    user_id = subject.id,
                    role = %subject.role,
                    action = action.as_str(),
                    resource = resource.as_str(),
                    "Permission denied"
                );
                return Err(AppError::permission_denied(format!(
                    "Permission denied: {} {}",
                    action.as_str(),
                    resource.as_str()
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::HeaderValue;
    use shared::error::ErrorCode;

    fn headers(id: Option<&str>, role: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(id) = id {
            map.insert(USER_ID_HEADER, HeaderValue::from_str(id).unwrap());
        }
        if let Some(role) = role {
            map.insert(USER_ROLE_HEADER, HeaderValue::from_str(role).unwrap());
        }
        map
    }

    #[test]
    fn test_subject_from_headers() {
        let subject = subject_from_headers(&headers(Some("7"), Some("admin"))).unwrap();
        assert_eq!(subject, Some(Subject { id: 7, role: Role::Admin }));

        assert_eq!(subject_from_headers(&headers(None, None)).unwrap(), None);
    }

    #[test]
    fn test_malformed_headers_are_unauthenticated() {
        for (id, role) in [
            (Some("abc"), Some("admin")),
            (Some("1"), Some("root")),
            (Some("1"), None),
            (None, Some("user")),
        ] {
            let err = subject_from_headers(&headers(id, role)).unwrap_err();
            assert_eq!(err.code, ErrorCode::NotAuthenticated);
        }
    }
}
