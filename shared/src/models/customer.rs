//! Customer Model

use serde::{Deserialize, Serialize};

use super::order::{Order, StatusCounts};

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    /// Unique across customers
    pub phone: String,
    /// Unique across customers
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Customer contact fields as embedded in order rows
///
/// Read from `customer_name`/`customer_phone`/`customer_email` columns of a join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerBrief {
    pub customer_id: i64,
    #[cfg_attr(feature = "db", sqlx(rename = "customer_name"))]
    pub name: String,
    #[cfg_attr(feature = "db", sqlx(rename = "customer_phone"))]
    pub phone: String,
    #[cfg_attr(feature = "db", sqlx(rename = "customer_email"))]
    pub email: String,
}

/// Create customer payload
///
/// Missing fields deserialize as empty strings so bulk import can report
/// them per record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Bulk update payload: one set of changes applied to every listed customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBulkUpdate {
    pub ids: Vec<i64>,
    pub changes: CustomerUpdate,
}

/// Customer with number of orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerWithOrderCount {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub customer: Customer,
    pub orders_count: i64,
}

/// Customer with lifetime spend (0 when the customer has no orders)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerWithSpend {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders_count: i64,
    pub total_spent: f64,
}

/// Customer with the orders placed in a date range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerWithOrders {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders: Vec<Order>,
}

/// Aggregates over one customer's orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerStats {
    pub total_orders: i64,
    pub total_spent: f64,
    /// None when the customer has no orders
    pub avg_order_value: Option<f64>,
    /// Unix millis of the earliest order
    pub first_order_date: Option<i64>,
    /// Unix millis of the latest order
    pub last_order_date: Option<i64>,
    pub status_counts: StatusCounts,
}

/// Customer detail with an order summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerOrdersSummary {
    pub customer: Customer,
    pub orders_summary: CustomerStats,
}

/// Spend-based customer tiers; every customer lands in exactly one
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerSegmentation {
    /// Spend > 1,000,000
    pub high_value: Vec<CustomerWithSpend>,
    /// 100,000 <= spend <= 1,000,000
    pub medium_value: Vec<CustomerWithSpend>,
    /// 0 < spend < 100,000
    pub low_value: Vec<CustomerWithSpend>,
    /// No spend yet
    pub new: Vec<CustomerWithSpend>,
}

/// A customer record that bulk import skipped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerImportFailure {
    pub index: usize,
    pub data: CustomerCreate,
    pub error: String,
}

/// Outcome of a bulk import: imported rows stay committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerImportReport {
    pub imported: Vec<Customer>,
    pub failed: Vec<CustomerImportFailure>,
    pub total_imported: usize,
    pub total_failed: usize,
}

/// Flat export row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerExportRow {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// `YYYY-MM-DD HH:MM:SS` in the business timezone
    pub created_at: String,
    pub total_orders: i64,
    pub total_spent: f64,
}

/// Availability of a phone number and/or email
///
/// `true` means no customer uses the value yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactAvailability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_available: Option<bool>,
}

/// Store-wide customer counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerOverview {
    pub total_customers: i64,
    pub with_orders: i64,
    pub without_orders: i64,
    /// Customers with more than one order
    pub repeat_customers: i64,
    pub new_last_30_days: i64,
    pub retention_rate: f64,
}

/// Per-customer value metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerLifetimeMetrics {
    pub customer_id: i64,
    pub lifetime_value: f64,
    pub average_order_value: Option<f64>,
    /// Orders per day between first and last order; `None` below two orders
    pub order_frequency: Option<f64>,
}
