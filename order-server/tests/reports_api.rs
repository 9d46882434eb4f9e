mod common;

use common::*;
use http::StatusCode;

#[tokio::test]
async fn reports_on_empty_store() {
    let (app, _) = test_app().await;
    for uri in [
        "/api/reports/orders-with-customers",
        "/api/reports/customers-no-orders",
        "/api/reports/orders-last-7-days",
        "/api/reports/max-order-per-customer",
        "/api/reports/daily-avg-vs-today",
        "/api/reports/order-summary",
        "/api/reports/revenue-trend",
    ] {
        let (status, body) = send(&app, "GET", uri, ADMIN, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert_eq!(body["code"], 0);
    }

    let (_, body) = send(&app, "GET", "/api/reports/daily-avg-vs-today", ADMIN, None).await;
    assert_eq!(body["data"]["comparison"]["trend"], "down");
    assert_eq!(body["data"]["comparison"]["percentage_change"], 0.0);
}

#[tokio::test]
async fn daily_average_vs_today() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;
    create_order(&app, customer, 10.0, NOW - 2 * DAY).await;
    create_order(&app, customer, 30.0, NOW).await;
    create_order(&app, customer, 10.0, NOW).await;

    let (status, body) = send(&app, "GET", "/api/reports/daily-avg-vs-today", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["today"]["orders"], 2);
    assert_eq!(data["today"]["revenue"], 40.0);
    assert_eq!(data["last_30_days_average"]["orders"], 1.0);
    assert_eq!(data["comparison"]["orders_difference"], 1.0);
    assert_eq!(data["comparison"]["percentage_change"], 100.0);
    assert_eq!(data["comparison"]["trend"], "up");
}

#[tokio::test]
async fn revenue_trend_period_and_limit() {
    let (app, _) = test_app().await;
    let customer = create_customer(&app, "A", "0801", "a@example.com").await;
    create_order(&app, customer, 10.0, NOW).await;
    create_order(&app, customer, 5.0, NOW - 40 * DAY).await;

    let (_, body) = send(&app, "GET", "/api/reports/revenue-trend?period=yearly", ADMIN, None).await;
    assert_eq!(body["data"]["period"], "monthly");
    assert_eq!(body["data"]["data"][0]["period"], "2024-03");
    assert_eq!(body["data"]["growth_analysis"][0]["growth_rate"], 100.0);

    let (_, body) = send(&app, "GET", "/api/reports/revenue-trend?period=daily&limit=1", ADMIN, None).await;
    assert_eq!(body["data"]["total_periods"], 1);
    assert_eq!(body["data"]["data"][0]["period"], "2024-03-13");

    let (status, _) = send(&app, "GET", "/api/reports/revenue-trend?limit=0", ADMIN, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customers_without_orders_report() {
    let (app, _) = test_app().await;
    let a = create_customer(&app, "A", "0801", "a@example.com").await;
    create_customer(&app, "B", "0802", "b@example.com").await;
    create_order(&app, a, 10.0, NOW).await;

    let (_, body) = send(&app, "GET", "/api/reports/customers-no-orders", ADMIN, None).await;
    assert_eq!(body["data"]["meta"]["total_customers"], 1);
    assert_eq!(body["data"]["meta"]["percentage"], 50.0);
    assert_eq!(body["data"]["data"][0]["name"], "B");
}
