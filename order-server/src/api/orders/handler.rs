//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{
    BestSellingDay, BulkCreateReport, CustomerOrderStatistics, DailyRevenue, DateRangeStatistics, GrowthRates,
    Order, OrderBulkUpdate, OrderCreate, OrderExportRow, OrderStatistics, OrderStatusUpdate, OrderUpdate,
    OrderWithCustomer, OrdersSummary, Paginated, TopCustomer,
};

use crate::api::{ApiResponse, ApiResult, IdsPayload, KeywordQuery, LimitQuery, parse_ids};
use crate::core::ServerState;

const DEFAULT_LIMIT: i64 = 10;
const DEFAULT_TREND_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AmountQuery {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Comma separated ids; every order when absent
    pub ids: Option<String>,
    #[serde(default = "default_true")]
    pub include_customer: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct AffectedRows {
    pub affected: u64,
}

/// GET /api/orders?page=&per_page=&status=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paginated<OrderWithCustomer>> {
    let per_page = state.page_size(query.per_page);
    let page = state
        .order_service()
        .list_orders(query.page.unwrap_or(1), per_page, query.status.as_deref())
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/orders/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<OrderWithCustomer> {
    Ok(ApiResponse::success(state.order_service().get_order(id).await?))
}

/// POST /api/orders - status defaults to pending
pub async fn create(State(state): State<ServerState>, Json(payload): Json<OrderCreate>) -> ApiResult<Order> {
    let order = state.order_service().create_order(&payload).await?;
    Ok(ApiResponse::success_with_message("Order created", order))
}

/// PUT /api/orders/{id} - field overwrite, status included
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> ApiResult<Order> {
    let order = state.order_service().update_order(id, &payload).await?;
    Ok(ApiResponse::success_with_message("Order updated", order))
}

/// DELETE /api/orders/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.order_service().delete_order(id).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/orders/{id}/status - force-set, no transition check
pub async fn force_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let order = state.order_service().force_set_status(id, &payload.status).await?;
    Ok(ApiResponse::success_with_message("Order status updated", order))
}

/// POST /api/orders/{id}/process-payment - pending → paid
pub async fn process_payment(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<Order> {
    let order = state.order_service().process_payment(id).await?;
    Ok(ApiResponse::success_with_message("Payment processed", order))
}

/// POST /api/orders/{id}/process-delivery - paid → delivered
pub async fn process_delivery(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<Order> {
    let order = state.order_service().process_delivery(id).await?;
    Ok(ApiResponse::success_with_message("Order delivered", order))
}

/// POST /api/orders/{id}/cancel - pending or paid → canceled
pub async fn cancel(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<Order> {
    let order = state.order_service().cancel_order(id).await?;
    Ok(ApiResponse::success_with_message("Order canceled", order))
}

/// GET /api/orders/search?q=
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<KeywordQuery>,
) -> ApiResult<Vec<OrderWithCustomer>> {
    Ok(ApiResponse::success(state.order_service().search_orders(&query.q).await?))
}

/// GET /api/orders/statistics
pub async fn statistics(State(state): State<ServerState>) -> ApiResult<OrderStatistics> {
    Ok(ApiResponse::success(state.order_service().order_statistics().await?))
}

/// GET /api/orders/period/{period} - today | yesterday | week | month | last_month
pub async fn by_period(
    State(state): State<ServerState>,
    Path(period): Path<String>,
) -> ApiResult<Vec<OrderWithCustomer>> {
    Ok(ApiResponse::success(state.order_service().orders_by_period(&period).await?))
}

/// GET /api/orders/status/{status}
pub async fn by_status(
    State(state): State<ServerState>,
    Path(status): Path<String>,
) -> ApiResult<Vec<OrderWithCustomer>> {
    Ok(ApiResponse::success(state.order_service().orders_by_status(&status).await?))
}

/// GET /api/orders/customer/{customer_id}
pub async fn by_customer(State(state): State<ServerState>, Path(customer_id): Path<i64>) -> ApiResult<Vec<Order>> {
    Ok(ApiResponse::success(state.order_service().orders_by_customer(customer_id).await?))
}

/// GET /api/orders/customer/{customer_id}/statistics
pub async fn customer_statistics(
    State(state): State<ServerState>,
    Path(customer_id): Path<i64>,
) -> ApiResult<CustomerOrderStatistics> {
    let stats = state.order_service().customer_order_statistics(customer_id).await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/orders/recent?limit=
pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<OrderWithCustomer>> {
    Ok(ApiResponse::success(state.order_service().recent_orders(query.or(DEFAULT_LIMIT)).await?))
}

/// GET /api/orders/above?amount=
pub async fn above(State(state): State<ServerState>, Query(query): Query<AmountQuery>) -> ApiResult<Vec<Order>> {
    Ok(ApiResponse::success(state.order_service().orders_above(query.amount).await?))
}

/// GET /api/orders/below?amount=
pub async fn below(State(state): State<ServerState>, Query(query): Query<AmountQuery>) -> ApiResult<Vec<Order>> {
    Ok(ApiResponse::success(state.order_service().orders_below(query.amount).await?))
}

/// GET /api/orders/top-customers/orders?limit=
pub async fn top_customers_by_orders(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<TopCustomer>> {
    let customers = state
        .order_service()
        .top_customers_by_orders(query.or(DEFAULT_LIMIT))
        .await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/orders/top-customers/revenue?limit=
pub async fn top_customers_by_revenue(
    State(state): State<ServerState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<TopCustomer>> {
    let customers = state
        .order_service()
        .top_customers_by_revenue(query.or(DEFAULT_LIMIT))
        .await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/orders/summary
pub async fn summary(State(state): State<ServerState>) -> ApiResult<OrdersSummary> {
    Ok(ApiResponse::success(state.order_service().orders_summary().await?))
}

/// GET /api/orders/revenue-trend?days=7
///
/// `days` must be within 1..=366.
pub async fn revenue_trend(
    State(state): State<ServerState>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Vec<DailyRevenue>> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    Ok(ApiResponse::success(state.order_service().revenue_trend(days).await?))
}

/// GET /api/orders/growth-rate - today against yesterday
pub async fn growth_rate(State(state): State<ServerState>) -> ApiResult<GrowthRates> {
    Ok(ApiResponse::success(state.order_service().growth_rates().await?))
}

/// GET /api/orders/best-selling-day
pub async fn best_selling_day(State(state): State<ServerState>) -> ApiResult<BestSellingDay> {
    Ok(ApiResponse::success(state.order_service().best_selling_day().await?))
}

/// GET /api/orders/date-range-statistics?start_date=&end_date=
pub async fn date_range_statistics(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<DateRangeStatistics> {
    let stats = state
        .order_service()
        .date_range_statistics(&query.start_date, &query.end_date)
        .await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/orders/export?ids=&include_customer=
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Vec<OrderExportRow>> {
    let ids = parse_ids(query.ids.as_deref())?;
    let rows = state
        .order_service()
        .export(ids.as_deref(), query.include_customer)
        .await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/orders/bulk-create - partial success, failures reported per item
pub async fn bulk_create(
    State(state): State<ServerState>,
    Json(items): Json<Vec<OrderCreate>>,
) -> ApiResult<BulkCreateReport> {
    let report = state.order_service().bulk_create_orders(items).await?;
    Ok(ApiResponse::success(report))
}

/// POST /api/orders/bulk-update - all or nothing
pub async fn bulk_update(
    State(state): State<ServerState>,
    Json(payload): Json<OrderBulkUpdate>,
) -> ApiResult<AffectedRows> {
    let affected = state.order_service().bulk_update(&payload.ids, &payload.changes).await?;
    Ok(ApiResponse::success(AffectedRows { affected }))
}

/// POST /api/orders/bulk-delete - all or nothing
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<IdsPayload>,
) -> ApiResult<AffectedRows> {
    let affected = state.order_service().bulk_delete(&payload.ids).await?;
    Ok(ApiResponse::success(AffectedRows { affected }))
}
