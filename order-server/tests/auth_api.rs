mod common;

use common::*;
use http::StatusCode;

#[tokio::test]
async fn health_is_public() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", ANONYMOUS, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn missing_identity_is_unauthenticated() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/orders", ANONYMOUS, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn malformed_identity_is_unauthenticated() {
    let (app, _) = test_app().await;
    let (status, _) = send(&app, "GET", "/api/orders", Some(("abc", "admin")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/api/orders", Some(("1", "superuser")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_role_defaults() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "Budi", "0811", "budi@example.com").await;
    let order = create_order(&app, customer, 25.0, NOW).await;

    // view customers, view/create/edit orders
    let (status, _) = send(&app, "GET", "/api/customers", USER, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/api/orders/{order}"), USER, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", &format!("/api/orders/{order}/process-payment"), USER, None).await;
    assert_eq!(status, StatusCode::OK);

    // everything else is forbidden
    let (status, body) = send(&app, "DELETE", &format!("/api/orders/{order}"), USER, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);
    let (status, _) = send(&app, "GET", "/api/reports/order-summary", USER, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        "POST",
        "/api/customers",
        USER,
        Some(serde_json::json!({ "name": "X", "phone": "0899", "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // admin may delete
    let (status, _) = send(&app, "DELETE", &format!("/api/orders/{order}"), ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn replaced_grants_apply_to_the_next_request() {
    use order_server::auth::{Action, Resource, Role};

    let (app, state) = test_app().await;
    let (status, _) = send(&app, "GET", "/api/reports/order-summary", USER, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    state.policy.replace_grants(Role::User, [(Action::View, Resource::Reports)]);

    let (status, _) = send(&app, "GET", "/api/reports/order-summary", USER, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/orders", USER, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
