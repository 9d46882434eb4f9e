//! Order Repository
//!
//! Totals are stored as integer cents; plain order rows expose them as a
//! money value via `order_total_cents / 100.0 AS order_total`. Aggregates
//! stay in cents and are converted with `shared::money`.

use shared::models::{
    Order, OrderStatistics, OrderStatus, OrderWithCustomer, StatusCounts, TopCustomer,
};
use shared::money::{average_cents, from_cents};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, page_offset, placeholders};

const ORDER_SELECT: &str = "SELECT o.order_id, o.customer_id, o.order_date, o.order_total_cents / 100.0 AS order_total, o.status, o.created_at, o.updated_at FROM orders o";

const ORDER_WITH_CUSTOMER_SELECT: &str = "SELECT o.order_id, o.customer_id, o.order_date, o.order_total_cents / 100.0 AS order_total, o.status, o.created_at, o.updated_at, c.name AS customer_name, c.phone AS customer_phone, c.email AS customer_email FROM orders o JOIN customers c ON c.customer_id = o.customer_id";

const NEWEST_FIRST: &str = "ORDER BY o.order_date DESC, o.order_id DESC";

/// A validated order ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub order_date: i64,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub customer_id: Option<i64>,
    pub total_cents: Option<i64>,
    pub status: Option<OrderStatus>,
    pub order_date: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct AggregateRow {
    total_orders: i64,
    total_cents: i64,
    max_cents: Option<i64>,
    min_cents: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct TopCustomerRow {
    customer_id: i64,
    name: String,
    phone: String,
    email: String,
    order_count: i64,
    total_cents: i64,
}

impl From<TopCustomerRow> for TopCustomer {
    fn from(row: TopCustomerRow) -> Self {
        Self {
            customer_id: row.customer_id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            order_count: row.order_count,
            total_revenue: from_cents(row.total_cents),
        }
    }
}

// ── Lookups ─────────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.order_id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Like [`find_by_id`] but a missing order is `NotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Order> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

pub async fn find_by_id_with_customer(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithCustomer>> {
    let sql = format!("{ORDER_WITH_CUSTOMER_SELECT} WHERE o.order_id = ?");
    let row = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<OrderWithCustomer>> {
    let sql = format!("{ORDER_WITH_CUSTOMER_SELECT} {NEWEST_FIRST}");
    let rows = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.customer_id = ? {NEWEST_FIRST}");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<OrderWithCustomer>> {
    let sql = format!("{ORDER_WITH_CUSTOMER_SELECT} WHERE o.status = ? {NEWEST_FIRST}");
    let rows = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Orders dated in `[start, end)`, oldest first
pub async fn find_by_date_range(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE o.order_date >= ? AND o.order_date < ? ORDER BY o.order_date, o.order_id"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Orders dated in `[start, end)` with their customer, newest first
pub async fn find_with_customer_between(
    pool: &SqlitePool,
    start: i64,
    end: i64,
) -> RepoResult<Vec<OrderWithCustomer>> {
    let sql = format!(
        "{ORDER_WITH_CUSTOMER_SELECT} WHERE o.order_date >= ? AND o.order_date < ? {NEWEST_FIRST}"
    );
    let rows = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Orders with customer for the given ids (every order when `None`), by id
pub async fn find_with_customer_by_ids(
    pool: &SqlitePool,
    ids: Option<&[i64]>,
) -> RepoResult<Vec<OrderWithCustomer>> {
    let rows = match ids {
        Some([]) => Vec::new(),
        Some(ids) => {
            let sql = format!(
                "{ORDER_WITH_CUSTOMER_SELECT} WHERE o.order_id IN ({}) ORDER BY o.order_id",
                placeholders(ids.len())
            );
            let mut query = sqlx::query_as::<_, OrderWithCustomer>(&sql);
            for id in ids {
                query = query.bind(id);
            }
            query.fetch_all(pool).await?
        }
        None => {
            let sql = format!("{ORDER_WITH_CUSTOMER_SELECT} ORDER BY o.order_id");
            sqlx::query_as::<_, OrderWithCustomer>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// `(order_date, order_total_cents)` for every order in `[start, end)`
///
/// Callers bucket these by business-timezone calendar day.
pub async fn amounts_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<(i64, i64)>> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT order_date, order_total_cents FROM orders WHERE order_date >= ? AND order_date < ? ORDER BY order_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `(order_date, order_total_cents)` for every order
pub async fn all_amounts(pool: &SqlitePool) -> RepoResult<Vec<(i64, i64)>> {
    let rows: Vec<(i64, i64)> =
        sqlx::query_as("SELECT order_date, order_total_cents FROM orders ORDER BY order_date")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

// ── Listings ────────────────────────────────────────────────────────

/// One page newest first, optionally filtered by status, plus the filtered total
pub async fn list_paginated(
    pool: &SqlitePool,
    page: u32,
    per_page: u32,
    status: Option<OrderStatus>,
) -> RepoResult<(Vec<OrderWithCustomer>, i64)> {
    let sql = format!(
        "{ORDER_WITH_CUSTOMER_SELECT} WHERE (?1 IS NULL OR o.status = ?1) {NEWEST_FIRST} LIMIT ?2 OFFSET ?3"
    );
    let rows = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .bind(status)
        .bind(i64::from(per_page))
        .bind(page_offset(page, per_page))
        .fetch_all(pool)
        .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE (?1 IS NULL OR status = ?1)")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok((rows, total))
}

pub async fn recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<OrderWithCustomer>> {
    let sql = format!("{ORDER_WITH_CUSTOMER_SELECT} ORDER BY o.created_at DESC, o.order_id DESC LIMIT ?");
    let rows = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Match the customer's name, phone or email, or the exact order id
pub async fn search(pool: &SqlitePool, keyword: &str) -> RepoResult<Vec<OrderWithCustomer>> {
    let pattern = format!("%{keyword}%");
    let sql = format!(
        "{ORDER_WITH_CUSTOMER_SELECT} WHERE c.name LIKE ?1 OR c.phone LIKE ?1 OR c.email LIKE ?1 OR CAST(o.order_id AS TEXT) = ?2 {NEWEST_FIRST}"
    );
    let rows = sqlx::query_as::<_, OrderWithCustomer>(&sql)
        .bind(&pattern)
        .bind(keyword)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn with_total_above(pool: &SqlitePool, cents: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.order_total_cents > ? ORDER BY o.order_total_cents DESC, o.order_id");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(cents)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn with_total_below(pool: &SqlitePool, cents: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.order_total_cents < ? ORDER BY o.order_total_cents, o.order_id");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(cents)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

// ── Writes ──────────────────────────────────────────────────────────

pub async fn create(pool: &SqlitePool, data: &NewOrder, now: i64) -> RepoResult<Order> {
    let id = sqlx::query(
        "INSERT INTO orders (customer_id, order_date, order_total_cents, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(data.customer_id)
    .bind(data.order_date)
    .bind(data.total_cents)
    .bind(data.status)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();
    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: i64, data: &OrderChanges, now: i64) -> RepoResult<Order> {
    let rows = sqlx::query(
        "UPDATE orders SET customer_id = COALESCE(?1, customer_id), order_total_cents = COALESCE(?2, order_total_cents), status = COALESCE(?3, status), order_date = COALESCE(?4, order_date), updated_at = ?5 WHERE order_id = ?6",
    )
    .bind(data.customer_id)
    .bind(data.total_cents)
    .bind(data.status)
    .bind(data.order_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    get(pool, id).await
}

/// Overwrite the status without consulting the transition table
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus, now: i64) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE order_id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    get(pool, id).await
}

/// Set `next` only while the stored status is still `expected`
///
/// Returns `false` when the row changed underneath (or vanished).
pub async fn compare_and_set_status(
    pool: &SqlitePool,
    id: i64,
    expected: OrderStatus,
    next: OrderStatus,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE order_id = ?3 AND status = ?4")
        .bind(next)
        .bind(now)
        .bind(id)
        .bind(expected)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Delete one order; the customer is untouched
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM orders WHERE order_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Apply the same changes to every id in one transaction (all-or-nothing)
pub async fn bulk_update(pool: &SqlitePool, ids: &[i64], data: &OrderChanges, now: i64) -> RepoResult<u64> {
    let mut tx = pool.begin().await?;
    let mut affected = 0;
    for id in ids {
        let rows = sqlx::query(
            "UPDATE orders SET customer_id = COALESCE(?1, customer_id), order_total_cents = COALESCE(?2, order_total_cents), status = COALESCE(?3, status), order_date = COALESCE(?4, order_date), updated_at = ?5 WHERE order_id = ?6",
        )
        .bind(data.customer_id)
        .bind(data.total_cents)
        .bind(data.status)
        .bind(data.order_date)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        affected += rows.rows_affected();
    }
    tx.commit().await?;
    Ok(affected)
}

pub async fn bulk_delete(pool: &SqlitePool, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!("DELETE FROM orders WHERE order_id IN ({})", placeholders(ids.len()));
    let mut tx = pool.begin().await?;
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(rows.rows_affected())
}

// ── Counters ────────────────────────────────────────────────────────

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_date >= ? AND order_date < ?")
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_customers_with_orders(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT customer_id) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn revenue_cents_total(pool: &SqlitePool) -> RepoResult<i64> {
    let cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(order_total_cents), 0) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(cents)
}

pub async fn revenue_cents_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<i64> {
    let cents: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(order_total_cents), 0) FROM orders WHERE order_date >= ? AND order_date < ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(cents)
}

pub async fn revenue_total(pool: &SqlitePool) -> RepoResult<f64> {
    Ok(from_cents(revenue_cents_total(pool).await?))
}

pub async fn revenue_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<f64> {
    let cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(order_total_cents), 0) FROM orders WHERE status = ?")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(from_cents(cents))
}

pub async fn revenue_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<f64> {
    let cents: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(order_total_cents), 0) FROM orders WHERE customer_id = ?")
            .bind(customer_id)
            .fetch_one(pool)
            .await?;
    Ok(from_cents(cents))
}

pub async fn revenue_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<f64> {
    Ok(from_cents(revenue_cents_between(pool, start, end).await?))
}

/// Mean order total, `None` without orders
pub async fn average_order_value(pool: &SqlitePool) -> RepoResult<Option<f64>> {
    let (count, cents): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(order_total_cents), 0) FROM orders")
            .fetch_one(pool)
            .await?;
    Ok((count > 0).then(|| average_cents(cents, count)))
}

pub async fn average_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Option<f64>> {
    let (count, cents): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(order_total_cents), 0) FROM orders WHERE customer_id = ?",
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await?;
    Ok((count > 0).then(|| average_cents(cents, count)))
}

// ── Aggregates ──────────────────────────────────────────────────────

/// Per-status counts over all orders, or over `[start, end)` when a range is given
pub async fn status_counts(pool: &SqlitePool, range: Option<(i64, i64)>) -> RepoResult<StatusCounts> {
    let (start, end) = range.unwrap_or((i64::MIN, i64::MAX));
    let rows: Vec<(OrderStatus, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM orders WHERE order_date >= ? AND order_date < ? GROUP BY status",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut counts = StatusCounts::default();
    for (status, count) in rows {
        counts.add(status, count);
    }
    Ok(counts)
}

/// Whole-table statistics; an empty table yields zeros and `None`s
pub async fn order_statistics(pool: &SqlitePool) -> RepoResult<OrderStatistics> {
    let row = sqlx::query_as::<_, AggregateRow>(
        "SELECT COUNT(*) AS total_orders, COALESCE(SUM(order_total_cents), 0) AS total_cents, MAX(order_total_cents) AS max_cents, MIN(order_total_cents) AS min_cents FROM orders",
    )
    .fetch_one(pool)
    .await?;

    Ok(OrderStatistics {
        total_orders: row.total_orders,
        total_revenue: from_cents(row.total_cents),
        average_order_value: (row.total_orders > 0).then(|| average_cents(row.total_cents, row.total_orders)),
        max_order_value: row.max_cents.map(from_cents),
        min_order_value: row.min_cents.map(from_cents),
        status_counts: status_counts(pool, None).await?,
    })
}

/// Customers ranked by number of orders (ties by id)
pub async fn top_customers_by_orders(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<TopCustomer>> {
    top_customers(pool, "order_count DESC", limit).await
}

/// Customers ranked by revenue (ties by id)
pub async fn top_customers_by_revenue(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<TopCustomer>> {
    top_customers(pool, "total_cents DESC", limit).await
}

async fn top_customers(pool: &SqlitePool, ranking: &str, limit: i64) -> RepoResult<Vec<TopCustomer>> {
    let sql = format!(
        "SELECT c.customer_id, c.name, c.phone, c.email, COUNT(o.order_id) AS order_count, COALESCE(SUM(o.order_total_cents), 0) AS total_cents FROM orders o JOIN customers c ON c.customer_id = o.customer_id GROUP BY c.customer_id ORDER BY {ranking}, c.customer_id LIMIT ?"
    );
    let rows = sqlx::query_as::<_, TopCustomerRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(TopCustomer::from).collect())
}

/// Largest order per customer with orders
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LargestOrderRow {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
    pub largest_cents: i64,
    pub total_orders: i64,
    pub total_cents: i64,
}

/// One row per customer with orders, biggest single order first (ties by id)
pub async fn largest_order_per_customer(pool: &SqlitePool) -> RepoResult<Vec<LargestOrderRow>> {
    let rows = sqlx::query_as::<_, LargestOrderRow>(
        "SELECT c.customer_id, c.name, c.phone, MAX(o.order_total_cents) AS largest_cents, COUNT(o.order_id) AS total_orders, SUM(o.order_total_cents) AS total_cents FROM orders o JOIN customers c ON c.customer_id = o.customer_id GROUP BY c.customer_id ORDER BY largest_cents DESC, c.customer_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
