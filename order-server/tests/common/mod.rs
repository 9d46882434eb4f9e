//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use order_server::db::DbService;
use order_server::utils::time::Clock;
use order_server::{Config, ServerState, build_app};
use serde_json::Value;
use tower::ServiceExt;

/// 2024-03-13 (Wednesday) 10:00 UTC
pub const NOW: i64 = 1_710_324_000_000;
pub const DAY: i64 = 86_400_000;

pub const ADMIN: Option<(&str, &str)> = Some(("1", "admin"));
pub const USER: Option<(&str, &str)> = Some(("2", "user"));
pub const ANONYMOUS: Option<(&str, &str)> = None;

pub async fn test_state() -> ServerState {
    let db = DbService::in_memory().await.expect("in-memory database");
    ServerState::new(db.pool, Config::default(), Clock::frozen(chrono_tz::UTC, NOW))
}

pub async fn test_app() -> (Router, ServerState) {
    let state = test_state().await;
    (build_app(state.clone()), state)
}

/// Send one request and decode the JSON envelope
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = caller {
        builder = builder.header("x-user-id", id).header("x-user-role", role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register a customer through the API and return its id
pub async fn create_customer(app: &Router, name: &str, phone: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/customers",
        ADMIN,
        Some(serde_json::json!({ "name": name, "phone": phone, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["customer_id"].as_i64().unwrap()
}

/// Create an order through the API and return its id
pub async fn create_order(app: &Router, customer_id: i64, total: f64, order_date: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/orders",
        ADMIN,
        Some(serde_json::json!({ "customer_id": customer_id, "order_total": total, "order_date": order_date })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["order_id"].as_i64().unwrap()
}
