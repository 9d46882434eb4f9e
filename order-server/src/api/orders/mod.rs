//! Order API
//!
//! Users may view, create and edit orders; deleting needs `delete orders`
//! (admin by default).

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{Action, Resource, require};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/search", get(handler::search))
        .route("/statistics", get(handler::statistics))
        .route("/recent", get(handler::recent))
        .route("/summary", get(handler::summary))
        .route("/above", get(handler::above))
        .route("/below", get(handler::below))
        .route("/period/{period}", get(handler::by_period))
        .route("/status/{status}", get(handler::by_status))
        .route("/customer/{customer_id}", get(handler::by_customer))
        .route("/customer/{customer_id}/statistics", get(handler::customer_statistics))
        .route("/top-customers/orders", get(handler::top_customers_by_orders))
        .route("/top-customers/revenue", get(handler::top_customers_by_revenue))
        .route("/revenue-trend", get(handler::revenue_trend))
        .route("/growth-rate", get(handler::growth_rate))
        .route("/best-selling-day", get(handler::best_selling_day))
        .route("/date-range-statistics", get(handler::date_range_statistics))
        .route("/export", get(handler::export))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require(Action::View, Resource::Orders)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .route("/bulk-create", post(handler::bulk_create))
        .layer(middleware::from_fn(require(Action::Create, Resource::Orders)));

    let edit_routes = Router::new()
        .route("/{id}", put(handler::update))
        .route("/{id}/status", post(handler::force_status))
        .route("/{id}/process-payment", post(handler::process_payment))
        .route("/{id}/process-delivery", post(handler::process_delivery))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/bulk-update", post(handler::bulk_update))
        .layer(middleware::from_fn(require(Action::Edit, Resource::Orders)));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .route("/bulk-delete", post(handler::bulk_delete))
        .layer(middleware::from_fn(require(Action::Delete, Resource::Orders)));

    read_routes.merge(create_routes).merge(edit_routes).merge(delete_routes)
}
