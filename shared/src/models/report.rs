//! Report Models

use serde::{Deserialize, Serialize};

use super::customer::CustomerBrief;
use super::order::OrderStatus;

/// Order row of the complete-orders report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteOrder {
    pub order_id: i64,
    pub order_date: i64,
    pub order_total: f64,
    pub status: OrderStatus,
    pub customer: CustomerBrief,
}

/// Customer without any order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerNoOrder {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Unix millis of registration
    #[cfg_attr(feature = "db", sqlx(rename = "created_at"))]
    pub registered_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomersNoOrderMeta {
    pub total_customers: i64,
    /// Share of all customers, 2 decimals
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomersNoOrderReport {
    pub data: Vec<CustomerNoOrder>,
    pub meta: CustomersNoOrderMeta,
}

/// Aggregates of one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyOrders {
    /// YYYY-MM-DD in the business timezone
    pub date: String,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyOrdersSummary {
    pub total_orders: i64,
    pub total_revenue: f64,
    /// Rounded to a whole number
    pub average_daily_orders: i64,
    pub average_daily_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyOrdersReport {
    pub data: Vec<DailyOrders>,
    pub summary: DailyOrdersSummary,
}

/// Largest order of one customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaxOrderCustomer {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub largest_order: f64,
    pub total_orders: i64,
    pub total_spent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaxOrderStatistics {
    pub total_customers: i64,
    /// None when there are no orders
    pub largest_order_overall: Option<f64>,
    pub average_largest_order: f64,
    pub customers_with_multiple_orders: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaxOrderReport {
    pub data: Vec<MaxOrderCustomer>,
    pub statistics: MaxOrderStatistics,
}

/// Today's metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodayMetrics {
    pub date: String,
    pub orders: i64,
    pub revenue: f64,
    pub average_order_value: f64,
}

/// Per-day averages over the 30 days before today
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodAverage {
    pub period: String,
    pub orders: f64,
    pub revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyComparison {
    pub orders_difference: f64,
    pub revenue_difference: f64,
    pub percentage_change: f64,
    /// `up` only when orders_difference > 0
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyAverageVsToday {
    pub today: TodayMetrics,
    pub last_30_days_average: PeriodAverage,
    pub comparison: DailyComparison,
}

/// Whole-store order summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummaryReport {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: Option<f64>,
    pub pending_orders: i64,
    pub paid_orders: i64,
    pub delivered_orders: i64,
    pub canceled_orders: i64,
    pub today_orders: i64,
    pub this_month_orders: i64,
    pub unique_customers: i64,
}

/// Revenue trend grouping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl TrendPeriod {
    /// Parse a period name; anything unrecognized means monthly
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("daily") => TrendPeriod::Daily,
            Some("weekly") => TrendPeriod::Weekly,
            _ => TrendPeriod::Monthly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendPeriod::Daily => "daily",
            TrendPeriod::Weekly => "weekly",
            TrendPeriod::Monthly => "monthly",
        }
    }
}

/// Revenue of one period bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`, `YYYY-Www` or `YYYY-MM`
    pub period: String,
    pub revenue: f64,
    pub orders: i64,
}

/// Growth of one bucket over the next older bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendGrowth {
    pub period: String,
    pub revenue: f64,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueTrendReport {
    /// Most recent first
    pub data: Vec<TrendPoint>,
    pub growth_analysis: Vec<TrendGrowth>,
    pub period: TrendPeriod,
    pub total_periods: usize,
}
