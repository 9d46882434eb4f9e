//! Report API - every route needs `view reports`

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{Action, Resource, require};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders-with-customers", get(handler::orders_with_customers))
        .route("/customers-no-orders", get(handler::customers_no_orders))
        .route("/orders-last-7-days", get(handler::orders_last_7_days))
        .route("/max-order-per-customer", get(handler::max_order_per_customer))
        .route("/daily-avg-vs-today", get(handler::daily_avg_vs_today))
        .route("/order-summary", get(handler::order_summary))
        .route("/revenue-trend", get(handler::revenue_trend))
        .layer(middleware::from_fn(require(Action::View, Resource::Reports)))
}
