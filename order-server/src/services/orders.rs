//! Order Service - order writes, guarded status transitions and order analytics
//!
//! All "today / yesterday / last N days" windows are resolved through the
//! [`Clock`] in the business timezone before reaching the repository.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use shared::models::{
    BestSellingDay, BulkCreateError, BulkCreateReport, CustomerOrderStatistics, CustomerOrderTotals,
    DailyRevenue, DateRangeStatistics, GrowthRates, Order, OrderCreate, OrderExportRow, OrderStatistics,
    OrderStatus, OrderUpdate, OrderWithCustomer, OrdersSummary, Paginated, TopCustomer,
};
use shared::money::{average_cents, from_cents, growth_percentage, to_cents};
use sqlx::SqlitePool;

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::RepoError;
use crate::db::repository::order::{self as order_repo, NewOrder, OrderChanges};
use crate::db::repository::customer as customer_repo;
use crate::orders::{Transition, validate_transition};
use crate::utils::time::{Clock, OrderPeriod, parse_date};
use crate::utils::validation::{MAX_KEYWORD_LEN, validate_amount, validate_required_text};

/// Days scanned by [`OrderService::best_selling_day`], today included
pub const BEST_DAY_WINDOW: u64 = 30;

/// Longest window accepted by [`OrderService::revenue_trend`]
pub const MAX_TREND_DAYS: u32 = 366;

// =============================================================================
// OrderService
// =============================================================================

#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
    clock: Clock,
}

impl OrderService {
    pub fn new(pool: SqlitePool, clock: Clock) -> Self {
        Self { pool, clock }
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Create an order for an existing customer
    ///
    /// Checked in order: the customer exists, the total is at least one
    /// cent, the status (if given) is a known value. Nothing is persisted
    /// when a check fails.
    pub async fn create_order(&self, data: &OrderCreate) -> ServiceResult<Order> {
        if !customer_repo::exists(&self.pool, data.customer_id).await? {
            return Err(ServiceError::CustomerNotFound(data.customer_id));
        }
        let total_cents = order_total_cents(data.order_total, true)?;
        let status = match &data.status {
            Some(status) => status.parse::<OrderStatus>()?,
            None => OrderStatus::default(),
        };

        let new_order = NewOrder {
            customer_id: data.customer_id,
            total_cents,
            status,
            order_date: data.order_date.unwrap_or_else(|| self.clock.now_millis()),
        };
        let order = order_repo::create(&self.pool, &new_order, self.clock.now_millis()).await?;
        tracing::info!(
            order_id = order.order_id,
            customer_id = order.customer_id,
            total = order.order_total,
            status = %order.status,
            "Order created"
        );
        Ok(order)
    }

    /// Create each order independently
    ///
    /// Rejected items are collected with their index and never stop the
    /// batch; orders created before a storage failure stay committed.
    pub async fn bulk_create_orders(&self, items: Vec<OrderCreate>) -> ServiceResult<BulkCreateReport> {
        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, data) in items.into_iter().enumerate() {
            match self.create_order(&data).await {
                Ok(order) => created.push(order),
                Err(ServiceError::Storage(msg)) => return Err(ServiceError::Storage(msg)),
                Err(err) => errors.push(BulkCreateError {
                    index,
                    data,
                    error: err.to_string(),
                }),
            }
        }

        tracing::info!(created = created.len(), failed = errors.len(), "Bulk order create finished");
        Ok(BulkCreateReport {
            total_created: created.len(),
            total_errors: errors.len(),
            created,
            errors,
        })
    }

    pub async fn update_order(&self, id: i64, data: &OrderUpdate) -> ServiceResult<Order> {
        if order_repo::find_by_id(&self.pool, id).await?.is_none() {
            return Err(ServiceError::OrderNotFound(id));
        }
        let changes = self.validate_changes(data).await?;
        let order = order_repo::update(&self.pool, id, &changes, self.clock.now_millis()).await?;
        tracing::info!(order_id = id, "Order updated");
        Ok(order)
    }

    pub async fn delete_order(&self, id: i64) -> ServiceResult<()> {
        order_repo::delete(&self.pool, id).await.map_err(|err| match err {
            RepoError::NotFound(_) => ServiceError::OrderNotFound(id),
            other => other.into(),
        })?;
        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }

    /// Same changes for every id, in one transaction
    pub async fn bulk_update(&self, ids: &[i64], data: &OrderUpdate) -> ServiceResult<u64> {
        let changes = self.validate_changes(data).await?;
        let affected = order_repo::bulk_update(&self.pool, ids, &changes, self.clock.now_millis()).await?;
        tracing::info!(requested = ids.len(), affected, "Bulk order update committed");
        Ok(affected)
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> ServiceResult<u64> {
        let affected = order_repo::bulk_delete(&self.pool, ids).await?;
        tracing::info!(requested = ids.len(), affected, "Bulk order delete committed");
        Ok(affected)
    }

    async fn validate_changes(&self, data: &OrderUpdate) -> ServiceResult<OrderChanges> {
        let total_cents = data
            .order_total
            .map(|total| order_total_cents(total, false))
            .transpose()?;
        let status = data
            .status
            .as_deref()
            .map(str::parse::<OrderStatus>)
            .transpose()?;
        if let Some(customer_id) = data.customer_id {
            if !customer_repo::exists(&self.pool, customer_id).await? {
                return Err(ServiceError::CustomerNotFound(customer_id));
            }
        }
        Ok(OrderChanges {
            customer_id: data.customer_id,
            total_cents,
            status,
            order_date: data.order_date,
        })
    }

    // ── Status ──────────────────────────────────────────────────────

    pub async fn process_payment(&self, id: i64) -> ServiceResult<Order> {
        self.apply_transition(id, Transition::Pay).await
    }

    pub async fn process_delivery(&self, id: i64) -> ServiceResult<Order> {
        self.apply_transition(id, Transition::Deliver).await
    }

    pub async fn cancel_order(&self, id: i64) -> ServiceResult<Order> {
        self.apply_transition(id, Transition::Cancel).await
    }

    /// Load, check against the transition table, then persist only the status
    ///
    /// The write is conditional on the status that was read; a concurrent
    /// change in between surfaces as `InvalidTransition`.
    async fn apply_transition(&self, id: i64, transition: Transition) -> ServiceResult<Order> {
        let order = order_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or(ServiceError::OrderNotFound(id))?;
        let next = transition.apply(order.status)?;

        let applied =
            order_repo::compare_and_set_status(&self.pool, id, order.status, next, self.clock.now_millis()).await?;
        if !applied {
            let current = order_repo::find_by_id(&self.pool, id)
                .await?
                .ok_or(ServiceError::OrderNotFound(id))?;
            tracing::warn!(order_id = id, expected = %order.status, found = %current.status, "Order status changed concurrently");
            return Err(ServiceError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        tracing::info!(order_id = id, action = transition.as_str(), from = %order.status, to = %next, "Order status transitioned");
        order_repo::get(&self.pool, id).await.map_err(Into::into)
    }

    /// Overwrite the status directly; only membership in the enumeration is checked
    pub async fn force_set_status(&self, id: i64, status: &str) -> ServiceResult<Order> {
        let status = status.parse::<OrderStatus>()?;
        if order_repo::find_by_id(&self.pool, id).await?.is_none() {
            return Err(ServiceError::OrderNotFound(id));
        }
        let order = order_repo::update_status(&self.pool, id, status, self.clock.now_millis()).await?;
        tracing::info!(order_id = id, status = %status, "Order status overwritten");
        Ok(order)
    }

    /// Whether `current -> next` is allowed, without touching storage
    pub fn validate_transition(&self, current: OrderStatus, next: OrderStatus) -> bool {
        validate_transition(current, next)
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub async fn get_order(&self, id: i64) -> ServiceResult<OrderWithCustomer> {
        order_repo::find_by_id_with_customer(&self.pool, id)
            .await?
            .ok_or(ServiceError::OrderNotFound(id))
    }

    pub async fn list_orders(
        &self,
        page: u32,
        per_page: u32,
        status: Option<&str>,
    ) -> ServiceResult<Paginated<OrderWithCustomer>> {
        let status = status.map(str::parse::<OrderStatus>).transpose()?;
        let page = page.max(1);
        let (rows, total) = order_repo::list_paginated(&self.pool, page, per_page, status).await?;
        Ok(Paginated::new(rows, total, page, per_page))
    }

    pub async fn orders_by_status(&self, status: &str) -> ServiceResult<Vec<OrderWithCustomer>> {
        let status = status.parse::<OrderStatus>()?;
        Ok(order_repo::find_by_status(&self.pool, status).await?)
    }

    /// Orders in a named calendar window, newest first
    pub async fn orders_by_period(&self, period: &str) -> ServiceResult<Vec<OrderWithCustomer>> {
        let period = period.parse::<OrderPeriod>()?;
        let (start, end) = self.clock.period_range(period)?;
        Ok(order_repo::find_with_customer_between(&self.pool, start, end).await?)
    }

    pub async fn orders_by_customer(&self, customer_id: i64) -> ServiceResult<Vec<Order>> {
        if !customer_repo::exists(&self.pool, customer_id).await? {
            return Err(ServiceError::CustomerNotFound(customer_id));
        }
        Ok(order_repo::find_by_customer(&self.pool, customer_id).await?)
    }

    pub async fn customer_order_statistics(&self, customer_id: i64) -> ServiceResult<CustomerOrderStatistics> {
        let customer = customer_repo::find_by_id(&self.pool, customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))?;
        let orders = order_repo::find_by_customer(&self.pool, customer_id).await?;
        let stats = customer_repo::customer_stats(&self.pool, customer_id).await?;
        Ok(CustomerOrderStatistics {
            customer,
            orders,
            statistics: CustomerOrderTotals {
                total_orders: stats.total_orders,
                total_spent: stats.total_spent,
                average_order_value: stats.avg_order_value,
                status_counts: stats.status_counts,
            },
        })
    }

    pub async fn recent_orders(&self, limit: i64) -> ServiceResult<Vec<OrderWithCustomer>> {
        Ok(order_repo::recent(&self.pool, limit).await?)
    }

    pub async fn search_orders(&self, keyword: &str) -> ServiceResult<Vec<OrderWithCustomer>> {
        let keyword = keyword.trim();
        validate_required_text(keyword, "keyword", MAX_KEYWORD_LEN)?;
        Ok(order_repo::search(&self.pool, keyword).await?)
    }

    pub async fn orders_above(&self, amount: f64) -> ServiceResult<Vec<Order>> {
        validate_amount(amount, "amount", false)?;
        Ok(order_repo::with_total_above(&self.pool, to_cents(amount)).await?)
    }

    pub async fn orders_below(&self, amount: f64) -> ServiceResult<Vec<Order>> {
        validate_amount(amount, "amount", false)?;
        Ok(order_repo::with_total_below(&self.pool, to_cents(amount)).await?)
    }

    // ── Analytics ───────────────────────────────────────────────────

    pub async fn order_statistics(&self) -> ServiceResult<OrderStatistics> {
        Ok(order_repo::order_statistics(&self.pool).await?)
    }

    pub async fn top_customers_by_orders(&self, limit: i64) -> ServiceResult<Vec<TopCustomer>> {
        Ok(order_repo::top_customers_by_orders(&self.pool, limit).await?)
    }

    pub async fn top_customers_by_revenue(&self, limit: i64) -> ServiceResult<Vec<TopCustomer>> {
        Ok(order_repo::top_customers_by_revenue(&self.pool, limit).await?)
    }

    pub async fn orders_summary(&self) -> ServiceResult<OrdersSummary> {
        let (today_start, today_end) = self.clock.day_range(self.clock.today());
        let total_orders = order_repo::count_all(&self.pool).await?;
        let total_cents = order_repo::revenue_cents_total(&self.pool).await?;

        Ok(OrdersSummary {
            total_orders,
            total_revenue: from_cents(total_cents),
            today_orders: order_repo::count_between(&self.pool, today_start, today_end).await?,
            today_revenue: order_repo::revenue_between(&self.pool, today_start, today_end).await?,
            pending_orders: order_repo::count_by_status(&self.pool, OrderStatus::Pending).await?,
            average_order_value: (total_orders > 0).then(|| average_cents(total_cents, total_orders)),
        })
    }

    /// Inclusive calendar-date range statistics (`YYYY-MM-DD`)
    pub async fn date_range_statistics(&self, start_date: &str, end_date: &str) -> ServiceResult<DateRangeStatistics> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        if end < start {
            return Err(ServiceError::Validation(format!(
                "end_date {end_date} is before start_date {start_date}"
            )));
        }

        let (from, to) = self.clock.dates_range(start, end);
        let total_orders = order_repo::count_between(&self.pool, from, to).await?;
        let total_cents = order_repo::revenue_cents_between(&self.pool, from, to).await?;

        Ok(DateRangeStatistics {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            total_orders,
            total_revenue: from_cents(total_cents),
            average_order_value: (total_orders > 0).then(|| average_cents(total_cents, total_orders)),
            status_counts: order_repo::status_counts(&self.pool, Some((from, to))).await?,
        })
    }

    /// Revenue for `days` consecutive calendar days ending today, oldest first
    ///
    /// Days without orders are present with 0.
    pub async fn revenue_trend(&self, days: u32) -> ServiceResult<Vec<DailyRevenue>> {
        if !(1..=MAX_TREND_DAYS).contains(&days) {
            return Err(ServiceError::Validation(format!(
                "days must be between 1 and {MAX_TREND_DAYS}"
            )));
        }
        let first = self.clock.days_ago(u64::from(days - 1))?;
        let by_day = self.revenue_by_day(first, self.clock.today()).await?;

        Ok(consecutive_days(first, days)
            .map(|date| DailyRevenue {
                date: date.format("%Y-%m-%d").to_string(),
                revenue: from_cents(by_day.get(&date).copied().unwrap_or(0)),
            })
            .collect())
    }

    /// Today's order count vs yesterday's, in percent
    pub async fn order_growth_rate(&self) -> ServiceResult<f64> {
        let (today, yesterday) = self.today_and_yesterday().await?;
        Ok(growth_percentage(today.0 as f64, yesterday.0 as f64))
    }

    /// Today's revenue vs yesterday's, in percent
    pub async fn revenue_growth_rate(&self) -> ServiceResult<f64> {
        let (today, yesterday) = self.today_and_yesterday().await?;
        Ok(growth_percentage(from_cents(today.1), from_cents(yesterday.1)))
    }

    pub async fn growth_rates(&self) -> ServiceResult<GrowthRates> {
        let (today, yesterday) = self.today_and_yesterday().await?;
        Ok(GrowthRates {
            order_growth_rate: growth_percentage(today.0 as f64, yesterday.0 as f64),
            revenue_growth_rate: growth_percentage(from_cents(today.1), from_cents(yesterday.1)),
        })
    }

    /// Highest-revenue day among today and the previous 29 days
    ///
    /// Scans from today backwards; only a strictly greater revenue replaces
    /// the current best, so ties keep the most recent day.
    pub async fn best_selling_day(&self) -> ServiceResult<BestSellingDay> {
        let today = self.clock.today();
        let first = self.clock.days_ago(BEST_DAY_WINDOW - 1)?;
        let by_day = self.revenue_by_day(first, today).await?;

        let mut best: Option<(NaiveDate, i64)> = None;
        for offset in 0..BEST_DAY_WINDOW {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            let cents = by_day.get(&date).copied().unwrap_or(0);
            let best_cents = best.map(|(_, c)| c).unwrap_or(0);
            if cents > best_cents {
                best = Some((date, cents));
            }
        }

        Ok(match best {
            Some((date, cents)) => BestSellingDay {
                date: Some(date.format("%Y-%m-%d").to_string()),
                revenue: from_cents(cents),
            },
            None => BestSellingDay {
                date: None,
                revenue: 0.0,
            },
        })
    }

    /// Flat export rows for the given ids (every order when `None`)
    pub async fn export(&self, ids: Option<&[i64]>, include_customer: bool) -> ServiceResult<Vec<OrderExportRow>> {
        let rows = order_repo::find_with_customer_by_ids(&self.pool, ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| OrderExportRow {
                order_id: row.order.order_id,
                order_date: self.clock.format_datetime(row.order.order_date),
                order_total: row.order.order_total,
                status: row.order.status,
                created_at: self.clock.format_datetime(row.order.created_at),
                customer: include_customer.then_some(row.customer),
            })
            .collect())
    }

    // ── Helpers ─────────────────────────────────────────────────────

    /// `((count, cents) today, (count, cents) yesterday)`
    async fn today_and_yesterday(&self) -> ServiceResult<((i64, i64), (i64, i64))> {
        let (today_start, today_end) = self.clock.day_range(self.clock.today());
        let (yesterday_start, yesterday_end) = self.clock.day_range(self.clock.days_ago(1)?);

        let today = (
            order_repo::count_between(&self.pool, today_start, today_end).await?,
            order_repo::revenue_cents_between(&self.pool, today_start, today_end).await?,
        );
        let yesterday = (
            order_repo::count_between(&self.pool, yesterday_start, yesterday_end).await?,
            order_repo::revenue_cents_between(&self.pool, yesterday_start, yesterday_end).await?,
        );
        Ok((today, yesterday))
    }

    /// Revenue in cents per business-timezone day over `[first, last]`
    async fn revenue_by_day(&self, first: NaiveDate, last: NaiveDate) -> ServiceResult<BTreeMap<NaiveDate, i64>> {
        let (start, end) = self.clock.dates_range(first, last);
        let mut by_day = BTreeMap::new();
        for (order_date, cents) in order_repo::amounts_between(&self.pool, start, end).await? {
            *by_day.entry(self.clock.date_of(order_date)).or_insert(0) += cents;
        }
        Ok(by_day)
    }
}

/// `count` consecutive dates starting at `first`
/// Validate an order total and convert it to cents
///
/// The positivity check runs on the cents that get stored, so a total
/// rounding to 0.00 is rejected.
fn order_total_cents(total: f64, strictly_positive: bool) -> ServiceResult<i64> {
    validate_amount(total, "order_total", strictly_positive).map_err(|e| ServiceError::InvalidTotal(e.0))?;
    let cents = to_cents(total);
    if strictly_positive && cents <= 0 {
        return Err(ServiceError::InvalidTotal("order_total must be at least 0.01".into()));
    }
    Ok(cents)
}

fn consecutive_days(first: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    (0..u64::from(count)).filter_map(move |offset| first.checked_add_days(Days::new(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testing::{seed_customer, seed_order, test_pool};

    // 2024-03-13 (Wednesday) 10:00 UTC
    const NOW: i64 = 1_710_324_000_000;
    const DAY: i64 = 86_400_000;

    async fn service() -> (OrderService, i64) {
        let pool = test_pool().await;
        let customer = seed_customer(&pool, "Budi", "0811", "budi@x.com", 0).await;
        (OrderService::new(pool, Clock::frozen(chrono_tz::UTC, NOW)), customer)
    }

    fn create(customer_id: i64, total: f64, status: Option<&str>) -> OrderCreate {
        OrderCreate {
            customer_id,
            order_total: total,
            status: status.map(String::from),
            order_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_pending() {
        let (service, customer) = service().await;
        let order = service.create_order(&create(customer, 25.5, None)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_total, 25.5);
        assert_eq!(order.order_date, NOW);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_and_persists_nothing() {
        let (service, customer) = service().await;

        for total in [0.0, -5.0, 0.004, f64::NAN] {
            let err = service.create_order(&create(customer, total, None)).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidTotal(_)), "{total}");
        }

        let err = service
            .create_order(&create(customer, 10.0, Some("shipped")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidStatus(_)));

        let err = service.create_order(&create(999, 10.0, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::CustomerNotFound(999)));

        // a missing customer is reported before a bad total
        let err = service.create_order(&create(999, 0.0, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::CustomerNotFound(999)));

        assert_eq!(order_repo::count_all(&service.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_smallest_total_is_one_cent() {
        let (service, customer) = service().await;
        let order = service.create_order(&create(customer, 0.006, None)).await.unwrap();
        assert_eq!(order.order_total, 0.01);

        let err = service
            .update_order(order.order_id, &OrderUpdate { order_total: Some(-1.0), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTotal(_)));
    }

    #[tokio::test]
    async fn test_guarded_transitions() {
        let (service, customer) = service().await;
        let order = service.create_order(&create(customer, 10.0, None)).await.unwrap();

        let err = service.process_delivery(order.order_id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            }
        ));

        let paid = service.process_payment(order.order_id).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        let delivered = service.process_delivery(order.order_id).await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);

        // terminal
        assert!(service.cancel_order(order.order_id).await.is_err());
        assert!(service.process_payment(order.order_id).await.is_err());

        let err = service.process_payment(4242).await.unwrap_err();
        assert!(matches!(err, ServiceError::OrderNotFound(4242)));
    }

    #[tokio::test]
    async fn test_cancel_from_paid() {
        let (service, customer) = service().await;
        let order = service.create_order(&create(customer, 10.0, Some("paid"))).await.unwrap();
        let canceled = service.cancel_order(order.order_id).await.unwrap();
        assert_eq!(canceled.status, OrderStatus::Canceled);
    }

    #[tokio::test]
    async fn test_force_set_status_ignores_transition_table() {
        let (service, customer) = service().await;
        let order = service.create_order(&create(customer, 10.0, Some("delivered"))).await.unwrap();
        let reopened = service.force_set_status(order.order_id, "pending").await.unwrap();
        assert_eq!(reopened.status, OrderStatus::Pending);

        let err = service.force_set_status(order.order_id, "lost").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidStatus(_)));
        assert!(!service.validate_transition(OrderStatus::Delivered, OrderStatus::Pending));
    }

    #[tokio::test]
    async fn test_bulk_create_continues_past_failures() {
        let (service, customer) = service().await;
        let report = service
            .bulk_create_orders(vec![
                create(customer, 10.0, None),
                create(customer, 0.0, None),
                create(999, 10.0, None),
                create(customer, 20.0, Some("paid")),
            ])
            .await
            .unwrap();
        assert_eq!(report.total_created, 2);
        assert_eq!(report.total_errors, 2);
        assert_eq!(report.errors[0].index, 1);
        assert_eq!(report.errors[1].index, 2);
        assert_eq!(report.errors[1].data.customer_id, 999);
    }

    #[tokio::test]
    async fn test_orders_by_period() {
        let (service, customer) = service().await;
        seed_order(&service.pool, customer, 100, "paid", NOW).await;
        seed_order(&service.pool, customer, 100, "paid", NOW - DAY).await;
        // 2024-02-20, last month
        seed_order(&service.pool, customer, 100, "paid", NOW - 22 * DAY).await;

        assert_eq!(service.orders_by_period("today").await.unwrap().len(), 1);
        assert_eq!(service.orders_by_period("yesterday").await.unwrap().len(), 1);
        assert_eq!(service.orders_by_period("week").await.unwrap().len(), 2);
        assert_eq!(service.orders_by_period("month").await.unwrap().len(), 2);
        assert_eq!(service.orders_by_period("last_month").await.unwrap().len(), 1);

        let today = service.orders_by_period("today").await.unwrap();
        assert_eq!(today[0].customer.name, "Budi");

        let err = service.orders_by_period("decade").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_growth_rates() {
        let (service, customer) = service().await;
        // nothing yesterday, nothing today
        let rates = service.growth_rates().await.unwrap();
        assert_eq!(rates.order_growth_rate, 0.0);
        assert_eq!(rates.revenue_growth_rate, 0.0);

        // nothing yesterday, something today
        seed_order(&service.pool, customer, 1000, "paid", NOW).await;
        assert_eq!(service.order_growth_rate().await.unwrap(), 100.0);
        assert_eq!(service.revenue_growth_rate().await.unwrap(), 100.0);

        // yesterday 2 orders / 40.00, today 1 order / 10.00
        seed_order(&service.pool, customer, 2000, "paid", NOW - DAY).await;
        seed_order(&service.pool, customer, 2000, "paid", NOW - DAY).await;
        assert_eq!(service.order_growth_rate().await.unwrap(), -50.0);
        assert_eq!(service.revenue_growth_rate().await.unwrap(), -75.0);
    }

    #[tokio::test]
    async fn test_best_selling_day() {
        let (service, customer) = service().await;
        let best = service.best_selling_day().await.unwrap();
        assert_eq!(best.date, None);
        assert_eq!(best.revenue, 0.0);

        seed_order(&service.pool, customer, 500, "paid", NOW - 2 * DAY).await;
        seed_order(&service.pool, customer, 500, "paid", NOW - 5 * DAY).await;
        seed_order(&service.pool, customer, 100, "paid", NOW).await;
        // outside the 30-day window
        seed_order(&service.pool, customer, 99_999, "paid", NOW - 31 * DAY).await;

        let best = service.best_selling_day().await.unwrap();
        // tie between 03-11 and 03-08 keeps the most recent
        assert_eq!(best.date.as_deref(), Some("2024-03-11"));
        assert_eq!(best.revenue, 5.0);
    }

    #[tokio::test]
    async fn test_revenue_trend_fills_empty_days() {
        let (service, customer) = service().await;
        seed_order(&service.pool, customer, 1000, "paid", NOW).await;
        seed_order(&service.pool, customer, 250, "paid", NOW - 2 * DAY).await;
        seed_order(&service.pool, customer, 250, "paid", NOW - 2 * DAY).await;

        let trend = service.revenue_trend(3).await.unwrap();
        let dates: Vec<&str> = trend.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-11", "2024-03-12", "2024-03-13"]);
        let revenue: Vec<f64> = trend.iter().map(|d| d.revenue).collect();
        assert_eq!(revenue, vec![5.0, 0.0, 10.0]);

        for days in [0, MAX_TREND_DAYS + 1, u32::MAX] {
            let err = service.revenue_trend(days).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{days}");
        }
        assert_eq!(service.revenue_trend(MAX_TREND_DAYS).await.unwrap().len(), 366);
    }

    #[tokio::test]
    async fn test_date_range_statistics() {
        let (service, customer) = service().await;
        seed_order(&service.pool, customer, 1000, "paid", NOW).await;
        seed_order(&service.pool, customer, 3000, "pending", NOW - DAY).await;
        seed_order(&service.pool, customer, 5000, "paid", NOW - 10 * DAY).await;

        let stats = service
            .date_range_statistics("2024-03-12", "2024-03-13")
            .await
            .unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, 40.0);
        assert_eq!(stats.average_order_value, Some(20.0));
        assert_eq!(stats.status_counts.paid, 1);
        assert_eq!(stats.status_counts.pending, 1);

        assert!(service.date_range_statistics("2024-03-13", "2024-03-01").await.is_err());
        assert!(service.date_range_statistics("13/03/2024", "2024-03-13").await.is_err());
    }

    #[tokio::test]
    async fn test_orders_summary_and_customer_statistics() {
        let (service, customer) = service().await;
        seed_order(&service.pool, customer, 1000, "pending", NOW).await;
        seed_order(&service.pool, customer, 2000, "paid", NOW - DAY).await;
        seed_order(&service.pool, customer, 3000, "paid", NOW - 2 * DAY).await;

        let summary = service.orders_summary().await.unwrap();
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.total_revenue, 60.0);
        assert_eq!(summary.today_orders, 1);
        assert_eq!(summary.today_revenue, 10.0);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(summary.average_order_value, Some(20.0));

        let stats = service.customer_order_statistics(customer).await.unwrap();
        assert_eq!(stats.orders.len(), 3);
        assert_eq!(stats.statistics.total_spent, 60.0);
        assert_eq!(stats.statistics.status_counts.paid, 2);
        assert!(matches!(
            service.customer_order_statistics(999).await.unwrap_err(),
            ServiceError::CustomerNotFound(999)
        ));
    }

    #[tokio::test]
    async fn test_update_and_bulk_operations() {
        let (service, customer) = service().await;
        let a = service.create_order(&create(customer, 10.0, None)).await.unwrap();
        let b = service.create_order(&create(customer, 20.0, None)).await.unwrap();

        let changes = OrderUpdate {
            order_total: Some(12.34),
            ..Default::default()
        };
        let updated = service.update_order(a.order_id, &changes).await.unwrap();
        assert_eq!(updated.order_total, 12.34);

        let bad_status = OrderUpdate {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert!(service.update_order(a.order_id, &bad_status).await.is_err());
        assert!(matches!(
            service.update_order(999, &changes).await.unwrap_err(),
            ServiceError::OrderNotFound(999)
        ));

        let paid = OrderUpdate {
            status: Some("paid".into()),
            ..Default::default()
        };
        assert_eq!(service.bulk_update(&[a.order_id, b.order_id], &paid).await.unwrap(), 2);
        assert_eq!(service.bulk_delete(&[a.order_id, b.order_id]).await.unwrap(), 2);
        assert!(matches!(
            service.delete_order(a.order_id).await.unwrap_err(),
            ServiceError::OrderNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_export() {
        let (service, customer) = service().await;
        let order = service.create_order(&create(customer, 10.0, None)).await.unwrap();

        let rows = service.export(None, true).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_date, "2024-03-13 10:00:00");
        assert_eq!(rows[0].customer.as_ref().unwrap().name, "Budi");

        let rows = service.export(Some([order.order_id].as_slice()), false).await.unwrap();
        assert!(rows[0].customer.is_none());
        assert!(service.export(Some(&[] as &[i64]), false).await.unwrap().is_empty());
    }
}
