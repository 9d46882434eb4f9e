//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::customer::CustomerBrief;

/// Order status
///
/// Stored and serialized as the lowercase name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Statuses reachable from this one through a guarded transition
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Paid, OrderStatus::Canceled],
            OrderStatus::Paid => &[OrderStatus::Delivered, OrderStatus::Canceled],
            OrderStatus::Delivered | OrderStatus::Canceled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status string outside the order status set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid order status: {0}")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "delivered" => Ok(OrderStatus::Delivered),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(InvalidOrderStatus(other.to_string())),
        }
    }
}

/// Order entity
///
/// `order_total` is read from integer cents and carries at most 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    /// Unix millis
    pub order_date: i64,
    pub order_total: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order joined with the customer it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub order: Order,
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub customer: CustomerBrief,
}

/// Create order payload
///
/// `status` stays a raw string so an unknown value is reported as a
/// validation failure of this order instead of rejecting the whole request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub order_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Unix millis; defaults to now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<i64>,
}

/// Update order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderUpdate {
    pub customer_id: Option<i64>,
    pub order_total: Option<f64>,
    pub status: Option<String>,
    pub order_date: Option<i64>,
}

/// Force-set status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// Bulk update payload: one set of changes applied to every listed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBulkUpdate {
    pub ids: Vec<i64>,
    pub changes: OrderUpdate,
}

/// Per-status order counts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub paid: i64,
    pub delivered: i64,
    pub canceled: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: OrderStatus, count: i64) {
        match status {
            OrderStatus::Pending => self.pending += count,
            OrderStatus::Paid => self.paid += count,
            OrderStatus::Delivered => self.delivered += count,
            OrderStatus::Canceled => self.canceled += count,
        }
    }
}

/// Whole-table order statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub total_revenue: f64,
    /// None when there are no orders
    pub average_order_value: Option<f64>,
    pub max_order_value: Option<f64>,
    pub min_order_value: Option<f64>,
    pub status_counts: StatusCounts,
}

/// Statistics over an inclusive calendar date range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRangeStatistics {
    pub start_date: String,
    pub end_date: String,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: Option<f64>,
    pub status_counts: StatusCounts,
}

/// Dashboard summary of orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdersSummary {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub today_orders: i64,
    pub today_revenue: f64,
    pub pending_orders: i64,
    pub average_order_value: Option<f64>,
}

/// Orders of one customer with their statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOrderStatistics {
    pub customer: super::customer::Customer,
    pub orders: Vec<Order>,
    pub statistics: CustomerOrderTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerOrderTotals {
    pub total_orders: i64,
    pub total_spent: f64,
    pub average_order_value: Option<f64>,
    pub status_counts: StatusCounts,
}

/// Customer ranked by order count or revenue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopCustomer {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub order_count: i64,
    pub total_revenue: f64,
}

/// Revenue of one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRevenue {
    /// YYYY-MM-DD in the business timezone
    pub date: String,
    pub revenue: f64,
}

/// Today-vs-yesterday growth percentages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthRates {
    pub order_growth_rate: f64,
    pub revenue_growth_rate: f64,
}

/// Highest-revenue day in the last 30 days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BestSellingDay {
    /// None when every day had zero revenue
    pub date: Option<String>,
    pub revenue: f64,
}

/// A bulk-create item that failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateError {
    pub index: usize,
    pub data: OrderCreate,
    pub error: String,
}

/// Outcome of a bulk create: successes stay committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateReport {
    pub created: Vec<Order>,
    pub errors: Vec<BulkCreateError>,
    pub total_created: usize,
    pub total_errors: usize,
}

/// Flat export row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderExportRow {
    pub order_id: i64,
    /// `YYYY-MM-DD HH:MM:SS` in the business timezone
    pub order_date: String,
    pub order_total: f64,
    pub status: OrderStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerBrief>,
}
