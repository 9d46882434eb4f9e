//! Customer API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{
    ContactAvailability, Customer, CustomerBulkUpdate, CustomerCreate, CustomerExportRow, CustomerImportReport,
    CustomerLifetimeMetrics, CustomerOrdersSummary, CustomerOverview, CustomerSegmentation, CustomerStats,
    CustomerUpdate, CustomerWithOrderCount, CustomerWithOrders, CustomerWithSpend, PageQuery, Paginated,
};

use crate::api::{ApiResponse, ApiResult, IdsPayload, KeywordQuery, LimitQuery, parse_ids};
use crate::core::ServerState;

const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Comma separated ids; every customer when absent
    pub ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AffectedRows {
    pub affected: u64,
}

#[derive(Debug, Serialize)]
pub struct RetentionRate {
    pub retention_rate: f64,
}

/// GET /api/customers - paginated, with order counts
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paginated<CustomerWithOrderCount>> {
    let per_page = state.page_size(query.per_page);
    let page = state
        .customer_service()
        .list_customers(query.page.unwrap_or(1), per_page)
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/customers/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<Customer> {
    Ok(ApiResponse::success(state.customer_service().get_customer(id).await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> ApiResult<Customer> {
    let customer = state.customer_service().register_customer(&payload).await?;
    Ok(ApiResponse::success_with_message("Customer created", customer))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> ApiResult<Customer> {
    let customer = state.customer_service().update_customer(id, &payload).await?;
    Ok(ApiResponse::success_with_message("Customer updated", customer))
}

/// DELETE /api/customers/{id} - the customer's orders go with it
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.customer_service().delete_customer(id).await?;
    Ok(ApiResponse::ok())
}

/// GET /api/customers/search?q=
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<KeywordQuery>,
) -> ApiResult<Vec<Customer>> {
    Ok(ApiResponse::success(state.customer_service().search(&query.q).await?))
}

/// GET /api/customers/recent?limit=
pub async fn recent(State(state): State<ServerState>, Query(query): Query<LimitQuery>) -> ApiResult<Vec<Customer>> {
    let customers = state.customer_service().recent(query.or(DEFAULT_LIMIT)).await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/without-orders
pub async fn without_orders(State(state): State<ServerState>) -> ApiResult<Vec<Customer>> {
    Ok(ApiResponse::success(state.customer_service().with_no_orders().await?))
}

/// GET /api/customers/with-orders
pub async fn with_orders(State(state): State<ServerState>) -> ApiResult<Vec<CustomerWithOrderCount>> {
    Ok(ApiResponse::success(state.customer_service().with_orders().await?))
}

/// GET /api/customers/order-status/{status}
pub async fn by_order_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> ApiResult<Vec<Customer>> {
    Ok(ApiResponse::success(state.customer_service().by_order_status(&status).await?))
}

/// GET /api/customers/ordered-between?start_date=&end_date=
pub async fn ordered_between(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Vec<CustomerWithOrders>> {
    let customers = state
        .customer_service()
        .with_orders_between(&query.start_date, &query.end_date)
        .await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/order-counts?start_date=&end_date=
pub async fn order_counts(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Vec<CustomerWithOrderCount>> {
    let customers = state
        .customer_service()
        .order_count_between(&query.start_date, &query.end_date)
        .await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/{id}/stats
pub async fn stats(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<CustomerStats> {
    Ok(ApiResponse::success(state.customer_service().customer_stats(id).await?))
}

/// GET /api/customers/{id}/orders-summary
pub async fn orders_summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<CustomerOrdersSummary> {
    Ok(ApiResponse::success(state.customer_service().orders_summary(id).await?))
}

/// GET /api/customers/{id}/lifetime
pub async fn lifetime(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<CustomerLifetimeMetrics> {
    Ok(ApiResponse::success(state.customer_service().lifetime_metrics(id).await?))
}

/// GET /api/customers/top-spending?limit=
pub async fn top_spending(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<CustomerWithSpend>> {
    let customers = state
        .customer_service()
        .top_spending_customers(query.or(DEFAULT_LIMIT))
        .await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/segmentation
pub async fn segmentation(State(state): State<ServerState>) -> ApiResult<CustomerSegmentation> {
    Ok(ApiResponse::success(state.customer_service().customer_segmentation().await?))
}

/// GET /api/customers/retention-rate
pub async fn retention_rate(State(state): State<ServerState>) -> ApiResult<RetentionRate> {
    let retention_rate = state.customer_service().customer_retention_rate().await?;
    Ok(ApiResponse::success(RetentionRate { retention_rate }))
}

/// GET /api/customers/overview
pub async fn overview(State(state): State<ServerState>) -> ApiResult<CustomerOverview> {
    Ok(ApiResponse::success(state.customer_service().overview().await?))
}

/// GET /api/customers/availability?phone=&email=
pub async fn availability(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<ContactAvailability> {
    let availability = state
        .customer_service()
        .contact_availability(query.phone.as_deref(), query.email.as_deref())
        .await?;
    Ok(ApiResponse::success(availability))
}

/// POST /api/customers/import - partial success, failures reported per record
pub async fn import(
    State(state): State<ServerState>,
    Json(records): Json<Vec<CustomerCreate>>,
) -> ApiResult<CustomerImportReport> {
    let report = state.customer_service().import_customers(records).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/customers/export?ids=1,2,3
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Vec<CustomerExportRow>> {
    let ids = parse_ids(query.ids.as_deref())?;
    let rows = state.customer_service().export(ids.as_deref()).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/customers/bulk-update - all or nothing
pub async fn bulk_update(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerBulkUpdate>,
) -> ApiResult<AffectedRows> {
    let affected = state
        .customer_service()
        .bulk_update(&payload.ids, &payload.changes)
        .await?;
    Ok(ApiResponse::success(AffectedRows { affected }))
}

/// POST /api/customers/bulk-delete - all or nothing
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<IdsPayload>,
) -> ApiResult<AffectedRows> {
    let affected = state.customer_service().bulk_delete(&payload.ids).await?;
    Ok(ApiResponse::success(AffectedRows { affected }))
}
