//! Report engine
//!
//! Read-only aggregations over the order store. Every report tolerates an
//! empty store and returns zeros / empty lists rather than an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{
    CompleteOrder, CustomerNoOrder, CustomersNoOrderMeta, CustomersNoOrderReport, DailyAverageVsToday,
    DailyComparison, DailyOrders, DailyOrdersReport, DailyOrdersSummary, MaxOrderCustomer, MaxOrderReport,
    MaxOrderStatistics, OrderSummaryReport, Paginated, PeriodAverage, RevenueTrendReport,
    TodayMetrics, Trend, TrendGrowth, TrendPeriod, TrendPoint,
};
use shared::money::{average_cents, from_cents, growth_percentage, to_f64};
use sqlx::SqlitePool;

use crate::db::repository::{customer as customer_repo, order as order_repo};
use crate::services::ServiceResult;
use crate::utils::time::{Clock, OrderPeriod, iso_week_key, month_key};

/// Calendar days before today averaged by [`ReportEngine::daily_average_vs_today`]
pub const AVERAGE_WINDOW_DAYS: u64 = 30;

/// Days covered by [`ReportEngine::daily_orders_last_7_days`], today included
pub const RECENT_DAYS: u64 = 7;

/// Default number of periods in a revenue trend
pub const DEFAULT_TREND_LIMIT: usize = 12;

/// Per-day order count and revenue in cents
#[derive(Debug, Clone, Copy, Default)]
struct DayBucket {
    orders: i64,
    cents: i64,
}

#[derive(Debug, Clone)]
pub struct ReportEngine {
    pool: SqlitePool,
    clock: Clock,
}

impl ReportEngine {
    pub fn new(pool: SqlitePool, clock: Clock) -> Self {
        Self { pool, clock }
    }

    /// Orders joined with their customer, newest first, one page at a time
    pub async fn complete_orders(&self, page: u32, per_page: u32) -> ServiceResult<Paginated<CompleteOrder>> {
        let page = page.max(1);
        let (rows, total) = order_repo::list_paginated(&self.pool, page, per_page, None).await?;
        let data = rows
            .into_iter()
            .map(|row| CompleteOrder {
                order_id: row.order.order_id,
                order_date: row.order.order_date,
                order_total: row.order.order_total,
                status: row.order.status,
                customer: row.customer,
            })
            .collect();
        Ok(Paginated::new(data, total, page, per_page))
    }

    /// Customers that never ordered, with their share of all customers
    pub async fn customers_with_no_orders(&self) -> ServiceResult<CustomersNoOrderReport> {
        let customers = customer_repo::with_no_orders(&self.pool).await?;
        let all_customers = customer_repo::count_all(&self.pool).await?;
        let total = customers.len() as i64;

        Ok(CustomersNoOrderReport {
            data: customers
                .into_iter()
                .map(|c| CustomerNoOrder {
                    customer_id: c.customer_id,
                    name: c.name,
                    phone: c.phone,
                    email: c.email,
                    registered_at: c.created_at,
                })
                .collect(),
            meta: CustomersNoOrderMeta {
                total_customers: total,
                percentage: shared::util::percentage(total, all_customers),
            },
        })
    }

    /// Per-day totals over the last seven days (only days with orders), newest first
    pub async fn daily_orders_last_7_days(&self) -> ServiceResult<DailyOrdersReport> {
        let first = self.clock.days_ago(RECENT_DAYS - 1)?;
        let buckets = self.day_buckets(first, self.clock.today()).await?;

        let data: Vec<DailyOrders> = buckets
            .iter()
            .rev()
            .map(|(date, bucket)| DailyOrders {
                date: date.format("%Y-%m-%d").to_string(),
                total_orders: bucket.orders,
                total_revenue: from_cents(bucket.cents),
                average_order_value: average_cents(bucket.cents, bucket.orders),
            })
            .collect();

        let total_orders: i64 = buckets.values().map(|b| b.orders).sum();
        let total_cents: i64 = buckets.values().map(|b| b.cents).sum();
        let days = (buckets.len() as i64).max(1);

        Ok(DailyOrdersReport {
            data,
            summary: DailyOrdersSummary {
                total_orders,
                total_revenue: from_cents(total_cents),
                average_daily_orders: (total_orders as f64 / days as f64).round() as i64,
                average_daily_revenue: average_cents(total_cents, days),
            },
        })
    }

    /// Each customer's largest order, biggest first, plus overall statistics
    pub async fn max_order_per_customer(&self) -> ServiceResult<MaxOrderReport> {
        let rows = order_repo::largest_order_per_customer(&self.pool).await?;

        let total_customers = rows.len() as i64;
        let largest_overall = rows.iter().map(|r| r.largest_cents).max();
        let largest_sum: i64 = rows.iter().map(|r| r.largest_cents).sum();
        let multiple = rows.iter().filter(|r| r.total_orders > 1).count() as i64;

        Ok(MaxOrderReport {
            data: rows
                .into_iter()
                .map(|r| MaxOrderCustomer {
                    customer_id: r.customer_id,
                    name: r.name,
                    phone: r.phone,
                    largest_order: from_cents(r.largest_cents),
                    total_orders: r.total_orders,
                    total_spent: from_cents(r.total_cents),
                })
                .collect(),
            statistics: MaxOrderStatistics {
                total_customers,
                largest_order_overall: largest_overall.map(from_cents),
                average_largest_order: average_cents(largest_sum, total_customers),
                customers_with_multiple_orders: multiple,
            },
        })
    }

    /// Today against the daily average of the previous 30 calendar days
    ///
    /// The average runs over the days in the window that had orders. A zero
    /// order difference reports `down`.
    pub async fn daily_average_vs_today(&self) -> ServiceResult<DailyAverageVsToday> {
        let today = self.clock.today();
        let (today_start, today_end) = self.clock.day_range(today);
        let today_orders = order_repo::count_between(&self.pool, today_start, today_end).await?;
        let today_cents = order_repo::revenue_cents_between(&self.pool, today_start, today_end).await?;

        let first = self.clock.days_ago(AVERAGE_WINDOW_DAYS)?;
        let last = self.clock.days_ago(1)?;
        let buckets = self.day_buckets(first, last).await?;

        let (avg_orders, avg_revenue, avg_order_value) = if buckets.is_empty() {
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        } else {
            let days = Decimal::from(buckets.len() as i64);
            let orders: i64 = buckets.values().map(|b| b.orders).sum();
            let cents: i64 = buckets.values().map(|b| b.cents).sum();
            let daily_averages: Decimal = buckets
                .values()
                .map(|b| Decimal::new(b.cents, 2) / Decimal::from(b.orders))
                .sum();
            (
                Decimal::from(orders) / days,
                Decimal::new(cents, 2) / days,
                daily_averages / days,
            )
        };

        let orders_difference = Decimal::from(today_orders) - avg_orders;
        let revenue_difference = Decimal::new(today_cents, 2) - avg_revenue;
        let percentage_change = if avg_orders > Decimal::ZERO {
            to_f64(orders_difference / avg_orders * Decimal::ONE_HUNDRED)
        } else {
            0.0
        };

        Ok(DailyAverageVsToday {
            today: TodayMetrics {
                date: today.format("%Y-%m-%d").to_string(),
                orders: today_orders,
                revenue: from_cents(today_cents),
                average_order_value: average_cents(today_cents, today_orders),
            },
            last_30_days_average: PeriodAverage {
                period: "last_30_days".into(),
                orders: to_f64(avg_orders),
                revenue: to_f64(avg_revenue),
                average_order_value: to_f64(avg_order_value),
            },
            comparison: DailyComparison {
                orders_difference: to_f64(orders_difference),
                revenue_difference: to_f64(revenue_difference),
                percentage_change,
                trend: if orders_difference > Decimal::ZERO { Trend::Up } else { Trend::Down },
            },
        })
    }

    /// Revenue grouped by day / ISO week / month, most recent first
    ///
    /// `growth_analysis[i]` compares period `i` with the older period `i + 1`.
    pub async fn revenue_trend(&self, period: TrendPeriod, limit: usize) -> ServiceResult<RevenueTrendReport> {
        let mut groups: BTreeMap<String, DayBucket> = BTreeMap::new();
        for (order_date, cents) in order_repo::all_amounts(&self.pool).await? {
            let date = self.clock.date_of(order_date);
            let key = match period {
                TrendPeriod::Daily => date.format("%Y-%m-%d").to_string(),
                TrendPeriod::Weekly => iso_week_key(date),
                TrendPeriod::Monthly => month_key(date),
            };
            let bucket = groups.entry(key).or_default();
            bucket.orders += 1;
            bucket.cents += cents;
        }

        // Keys sort chronologically as strings
        let data: Vec<TrendPoint> = groups
            .into_iter()
            .rev()
            .take(limit)
            .map(|(key, bucket)| TrendPoint {
                period: key,
                revenue: from_cents(bucket.cents),
                orders: bucket.orders,
            })
            .collect();

        let growth_analysis = data
            .windows(2)
            .map(|pair| TrendGrowth {
                period: pair[0].period.clone(),
                revenue: pair[0].revenue,
                growth_rate: growth_percentage(pair[0].revenue, pair[1].revenue),
            })
            .collect();

        Ok(RevenueTrendReport {
            total_periods: data.len(),
            data,
            growth_analysis,
            period,
        })
    }

    /// Store-wide order counters
    pub async fn order_summary(&self) -> ServiceResult<OrderSummaryReport> {
        let total_orders = order_repo::count_all(&self.pool).await?;
        let total_cents = order_repo::revenue_cents_total(&self.pool).await?;
        let counts = order_repo::status_counts(&self.pool, None).await?;
        let (today_start, today_end) = self.clock.period_range(OrderPeriod::Today)?;
        let (month_start, month_end) = self.clock.period_range(OrderPeriod::Month)?;

        Ok(OrderSummaryReport {
            total_orders,
            total_revenue: from_cents(total_cents),
            average_order_value: (total_orders > 0).then(|| average_cents(total_cents, total_orders)),
            pending_orders: counts.pending,
            paid_orders: counts.paid,
            delivered_orders: counts.delivered,
            canceled_orders: counts.canceled,
            today_orders: order_repo::count_between(&self.pool, today_start, today_end).await?,
            this_month_orders: order_repo::count_between(&self.pool, month_start, month_end).await?,
            unique_customers: order_repo::count_customers_with_orders(&self.pool).await?,
        })
    }

    /// Orders per business-timezone day over `[first, last]`, days without orders omitted
    async fn day_buckets(&self, first: NaiveDate, last: NaiveDate) -> ServiceResult<BTreeMap<NaiveDate, DayBucket>> {
        let (start, end) = self.clock.dates_range(first, last);
        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        for (order_date, cents) in order_repo::amounts_between(&self.pool, start, end).await? {
            let bucket = buckets.entry(self.clock.date_of(order_date)).or_default();
            bucket.orders += 1;
            bucket.cents += cents;
        }
        Ok(buckets)
    }
}
