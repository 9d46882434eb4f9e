//! Customer API
//!
//! | Capability | Routes |
//! |------------|--------|
//! | view customers | listings, detail, metrics, search, availability, export |
//! | create customers | create, import |
//! | edit customers | update, bulk update |
//! | delete customers | delete, bulk delete |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{Action, Resource, require};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/search", get(handler::search))
        .route("/recent", get(handler::recent))
        .route("/without-orders", get(handler::without_orders))
        .route("/with-orders", get(handler::with_orders))
        .route("/order-status/{status}", get(handler::by_order_status))
        .route("/ordered-between", get(handler::ordered_between))
        .route("/order-counts", get(handler::order_counts))
        .route("/top-spending", get(handler::top_spending))
        .route("/segmentation", get(handler::segmentation))
        .route("/retention-rate", get(handler::retention_rate))
        .route("/overview", get(handler::overview))
        .route("/availability", get(handler::availability))
        .route("/export", get(handler::export))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/stats", get(handler::stats))
        .route("/{id}/orders-summary", get(handler::orders_summary))
        .route("/{id}/lifetime", get(handler::lifetime))
        .layer(middleware::from_fn(require(Action::View, Resource::Customers)));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .route("/import", post(handler::import))
        .layer(middleware::from_fn(require(Action::Create, Resource::Customers)));

    let edit_routes = Router::new()
        .route("/{id}", put(handler::update))
        .route("/bulk-update", post(handler::bulk_update))
        .layer(middleware::from_fn(require(Action::Edit, Resource::Customers)));

    let delete_routes = Router::new()
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/bulk-delete", post(handler::bulk_delete))
        .layer(middleware::from_fn(require(Action::Delete, Resource::Customers)));

    read_routes.merge(create_routes).merge(edit_routes).merge(delete_routes)
}
