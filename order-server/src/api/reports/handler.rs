//! Report API handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::models::{
    CompleteOrder, CustomersNoOrderReport, DailyAverageVsToday, DailyOrdersReport, MaxOrderReport,
    OrderSummaryReport, PageQuery, Paginated, RevenueTrendReport, TrendPeriod,
};

use crate::api::{ApiResponse, ApiResult, AppError};
use crate::core::{ServerState, page_size_or};
use crate::reports::DEFAULT_TREND_LIMIT;

const COMPLETE_ORDERS_PAGE_SIZE: u32 = 20;
const MAX_TREND_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// daily | weekly | monthly
    pub period: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/reports/orders-with-customers?page=&per_page=
pub async fn orders_with_customers(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paginated<CompleteOrder>> {
    let per_page = page_size_or(query.per_page, COMPLETE_ORDERS_PAGE_SIZE);
    let page = state
        .report_engine()
        .complete_orders(query.page.unwrap_or(1), per_page)
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/reports/customers-no-orders
pub async fn customers_no_orders(State(state): State<ServerState>) -> ApiResult<CustomersNoOrderReport> {
    Ok(ApiResponse::success(state.report_engine().customers_with_no_orders().await?))
}

/// GET /api/reports/orders-last-7-days
pub async fn orders_last_7_days(State(state): State<ServerState>) -> ApiResult<DailyOrdersReport> {
    Ok(ApiResponse::success(state.report_engine().daily_orders_last_7_days().await?))
}

/// GET /api/reports/max-order-per-customer
pub async fn max_order_per_customer(State(state): State<ServerState>) -> ApiResult<MaxOrderReport> {
    Ok(ApiResponse::success(state.report_engine().max_order_per_customer().await?))
}

/// GET /api/reports/daily-avg-vs-today
pub async fn daily_avg_vs_today(State(state): State<ServerState>) -> ApiResult<DailyAverageVsToday> {
    Ok(ApiResponse::success(state.report_engine().daily_average_vs_today().await?))
}

/// GET /api/reports/order-summary
pub async fn order_summary(State(state): State<ServerState>) -> ApiResult<OrderSummaryReport> {
    Ok(ApiResponse::success(state.report_engine().order_summary().await?))
}

/// GET /api/reports/revenue-trend?period=monthly&limit=12
///
/// Unknown periods fall back to monthly; `limit` must be within 1..=100.
pub async fn revenue_trend(
    State(state): State<ServerState>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<RevenueTrendReport> {
    let limit = query.limit.unwrap_or(DEFAULT_TREND_LIMIT);
    if !(1..=MAX_TREND_LIMIT).contains(&limit) {
        return Err(AppError::validation(format!("limit must be between 1 and {MAX_TREND_LIMIT}")));
    }
    let period = TrendPeriod::parse_or_default(query.period.as_deref());
    let report = state.report_engine().revenue_trend(period, limit).await?;
    Ok(ApiResponse::success(report))
}
