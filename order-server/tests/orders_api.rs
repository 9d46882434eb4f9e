mod common;

use common::*;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_defaults_to_pending() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        USER,
        Some(json!({ "customer_id": customer, "order_total": 19.99 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["order_total"], 19.99);
    assert_eq!(body["data"]["order_date"], NOW);
}

#[tokio::test]
async fn invalid_orders_persist_nothing() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        ADMIN,
        Some(json!({ "customer_id": customer, "order_total": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    // rounds to 0.00
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        ADMIN,
        Some(json!({ "customer_id": customer, "order_total": 0.004 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        ADMIN,
        Some(json!({ "customer_id": customer, "order_total": 10, "status": "shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        ADMIN,
        Some(json!({ "customer_id": 999, "order_total": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        ADMIN,
        Some(json!({ "customer_id": 999, "order_total": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    let (_, body) = send(&app, "GET", "/api/orders", ADMIN, None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn guarded_lifecycle() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;
    let order = create_order(&app, customer, 10.0, NOW).await;

    // pending cannot be delivered
    let (status, body) = send(&app, "POST", &format!("/api/orders/{order}/process-delivery"), ADMIN, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4002);
    assert_eq!(body["details"]["from"], "pending");
    assert_eq!(body["details"]["to"], "delivered");

    let (status, body) = send(&app, "POST", &format!("/api/orders/{order}/process-payment"), ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paid");

    let (status, body) = send(&app, "POST", &format!("/api/orders/{order}/process-delivery"), ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "delivered");

    // delivered is terminal for guarded transitions
    let (status, _) = send(&app, "POST", &format!("/api/orders/{order}/cancel"), ADMIN, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // force-set bypasses the table
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/orders/{order}/status"),
        ADMIN,
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/orders/42", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, _) = send(&app, "POST", "/api/orders/42/cancel", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_create_reports_failures() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders/bulk-create",
        ADMIN,
        Some(json!([
            { "customer_id": customer, "order_total": 10 },
            { "customer_id": customer, "order_total": -5 },
            { "customer_id": 999, "order_total": 10 },
            { "customer_id": customer, "order_total": 20, "status": "paid" }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_created"], 2);
    assert_eq!(body["data"]["total_errors"], 2);
    assert_eq!(body["data"]["errors"][0]["index"], 1);
    assert_eq!(body["data"]["errors"][1]["index"], 2);
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;
    for i in 0..3 {
        create_order(&app, customer, 10.0 + i as f64, NOW - i * DAY).await;
    }

    let (status, body) = send(&app, "GET", "/api/orders?page=1&per_page=2", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["last_page"], 2);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["data"][0]["customer"]["name"], "A");

    let (status, body) = send(&app, "GET", "/api/orders?page=4294967295&per_page=4294967295", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["per_page"], 100);
    assert_eq!(body["data"]["total"], 3);
    assert!(body["data"]["data"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        "GET",
        "/api/reports/orders-with-customers?page=4294967295&per_page=4294967295",
        ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["per_page"], 100);

    let (_, body) = send(&app, "GET", "/api/orders?status=paid", ADMIN, None).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(&app, "GET", "/api/orders?status=bogus", ADMIN, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/orders/period/today", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn analytics_endpoints() {
    let (app, _) = test_app().await;

    let (_, body) = send(&app, "GET", "/api/orders/best-selling-day", ADMIN, None).await;
    assert_eq!(body["data"]["date"], serde_json::Value::Null);
    assert_eq!(body["data"]["revenue"], 0.0);

    let (_, body) = send(&app, "GET", "/api/orders/growth-rate", ADMIN, None).await;
    assert_eq!(body["data"]["order_growth_rate"], 0.0);

    let customer = create_customer(&app, "A", "0801", "a@example.com").await;
    create_order(&app, customer, 40.0, NOW).await;

    let (_, body) = send(&app, "GET", "/api/orders/growth-rate", ADMIN, None).await;
    assert_eq!(body["data"]["order_growth_rate"], 100.0);
    assert_eq!(body["data"]["revenue_growth_rate"], 100.0);

    let (_, body) = send(&app, "GET", "/api/orders/best-selling-day", ADMIN, None).await;
    assert_eq!(body["data"]["date"], "2024-03-13");
    assert_eq!(body["data"]["revenue"], 40.0);

    let (status, body) = send(&app, "GET", "/api/orders/revenue-trend?days=3", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    for days in ["0", "367", "4294967295"] {
        let (status, body) = send(&app, "GET", &format!("/api/orders/revenue-trend?days={days}"), ADMIN, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}");
        assert_eq!(body["code"], 2);
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/orders/date-range-statistics?start_date=2024-03-01&end_date=2024-03-13",
        ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_orders"], 1);

    let (status, _) = send(
        &app,
        "GET",
        "/api/orders/date-range-statistics?start_date=13-03-2024&end_date=2024-03-13",
        ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
