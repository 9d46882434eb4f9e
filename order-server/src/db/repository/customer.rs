//! Customer Repository

use std::collections::BTreeMap;

use shared::models::{
    Customer, CustomerCreate, CustomerSegmentation, CustomerStats, CustomerUpdate,
    CustomerWithOrderCount, CustomerWithOrders, CustomerWithSpend, Order, OrderStatus, StatusCounts,
};
use shared::money::{average_cents, from_cents};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, page_offset, placeholders};

const CUSTOMER_SELECT: &str =
    "SELECT c.customer_id, c.name, c.phone, c.email, c.created_at, c.updated_at FROM customers c";

const CUSTOMER_WITH_COUNT_SELECT: &str = "SELECT c.customer_id, c.name, c.phone, c.email, c.created_at, c.updated_at, COUNT(o.order_id) AS orders_count FROM customers c LEFT JOIN orders o ON o.customer_id = c.customer_id";

const CUSTOMER_WITH_SPEND_SELECT: &str = "SELECT c.customer_id, c.name, c.phone, c.email, c.created_at, c.updated_at, COUNT(o.order_id) AS orders_count, COALESCE(SUM(o.order_total_cents), 0) AS total_cents FROM customers c LEFT JOIN orders o ON o.customer_id = c.customer_id";

/// Lifetime spend above this is `high_value` (1,000,000.00)
pub const HIGH_VALUE_CENTS: i64 = 100_000_000;

/// Lifetime spend from this up to the high threshold is `medium_value` (100,000.00)
pub const MEDIUM_VALUE_CENTS: i64 = 10_000_000;

#[derive(Debug, sqlx::FromRow)]
struct SpendRow {
    #[sqlx(flatten)]
    customer: Customer,
    orders_count: i64,
    total_cents: i64,
}

impl From<SpendRow> for CustomerWithSpend {
    fn from(row: SpendRow) -> Self {
        Self {
            customer: row.customer,
            orders_count: row.orders_count,
            total_spent: from_cents(row.total_cents),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_orders: i64,
    total_cents: i64,
    first_order_date: Option<i64>,
    last_order_date: Option<i64>,
}

// ── Lookups ─────────────────────────────────────────────────────────

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} ORDER BY c.customer_id");
    let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_all_with_order_count(pool: &SqlitePool) -> RepoResult<Vec<CustomerWithOrderCount>> {
    let sql = format!("{CUSTOMER_WITH_COUNT_SELECT} GROUP BY c.customer_id ORDER BY c.customer_id");
    let rows = sqlx::query_as::<_, CustomerWithOrderCount>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE c.customer_id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Like [`find_by_id`] but a missing customer is `NotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Customer> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE c.phone = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(phone)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE c.email = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT customer_id FROM customers WHERE customer_id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// `true` when no customer (other than `exclude_id`) uses this phone
pub async fn is_phone_available(pool: &SqlitePool, phone: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM customers WHERE phone = ?1 AND (?2 IS NULL OR customer_id != ?2)",
    )
    .bind(phone)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count == 0)
}

/// `true` when no customer (other than `exclude_id`) uses this email
pub async fn is_email_available(pool: &SqlitePool, email: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM customers WHERE email = ?1 AND (?2 IS NULL OR customer_id != ?2)",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count == 0)
}

// ── Writes ──────────────────────────────────────────────────────────

pub async fn create(pool: &SqlitePool, data: &CustomerCreate, now: i64) -> RepoResult<Customer> {
    let id = sqlx::query(
        "INSERT INTO customers (name, phone, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();
    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: i64, data: &CustomerUpdate, now: i64) -> RepoResult<Customer> {
    let rows = sqlx::query(
        "UPDATE customers SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), email = COALESCE(?3, email), updated_at = ?4 WHERE customer_id = ?5",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    get(pool, id).await
}

/// Delete a customer; its orders go with it (`ON DELETE CASCADE`)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    Ok(())
}

/// Apply the same partial update to every id in one transaction
///
/// Any failing row (e.g. a phone already in use) rolls back all rows.
pub async fn bulk_update(pool: &SqlitePool, ids: &[i64], data: &CustomerUpdate, now: i64) -> RepoResult<u64> {
    let mut tx = pool.begin().await?;
    let mut affected = 0;
    for id in ids {
        let rows = sqlx::query(
            "UPDATE customers SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), email = COALESCE(?3, email), updated_at = ?4 WHERE customer_id = ?5",
        )
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.email)
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
    let sql = format!("DELETE FROM customers WHERE customer_id IN ({})", placeholders(ids.len()));
    let mut tx = pool.begin().await?;
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(rows.rows_affected())
}

// ── Listings ────────────────────────────────────────────────────────

/// One page ordered newest first, plus the total customer count
pub async fn list_paginated(
    pool: &SqlitePool,
    page: u32,
    per_page: u32,
) -> RepoResult<(Vec<CustomerWithOrderCount>, i64)> {
    let sql = format!(
        "{CUSTOMER_WITH_COUNT_SELECT} GROUP BY c.customer_id ORDER BY c.created_at DESC, c.customer_id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, CustomerWithOrderCount>(&sql)
        .bind(i64::from(per_page))
        .bind(page_offset(page, per_page))
        .fetch_all(pool)
        .await?;
    let total = count_all(pool).await?;
    Ok((rows, total))
}

pub async fn recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} ORDER BY c.created_at DESC, c.customer_id DESC LIMIT ?");
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Name, phone or email containing `keyword`
pub async fn search(pool: &SqlitePool, keyword: &str) -> RepoResult<Vec<Customer>> {
    let pattern = format!("%{keyword}%");
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE c.name LIKE ?1 OR c.phone LIKE ?1 OR c.email LIKE ?1 ORDER BY c.name, c.customer_id"
    );
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn with_no_orders(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE NOT EXISTS (SELECT 1 FROM orders o WHERE o.customer_id = c.customer_id) ORDER BY c.created_at DESC, c.customer_id DESC"
    );
    let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn with_orders(pool: &SqlitePool) -> RepoResult<Vec<CustomerWithOrderCount>> {
    let sql = format!(
        "{CUSTOMER_WITH_COUNT_SELECT} GROUP BY c.customer_id HAVING COUNT(o.order_id) > 0 ORDER BY orders_count DESC, c.customer_id"
    );
    let rows = sqlx::query_as::<_, CustomerWithOrderCount>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Customers with at least one order in `status`
pub async fn by_order_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE EXISTS (SELECT 1 FROM orders o WHERE o.customer_id = c.customer_id AND o.status = ?) ORDER BY c.customer_id"
    );
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Customers with orders in `[start, end)`, each with only those orders attached
pub async fn with_orders_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<CustomerWithOrders>> {
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE EXISTS (SELECT 1 FROM orders o WHERE o.customer_id = c.customer_id AND o.order_date >= ?1 AND o.order_date < ?2) ORDER BY c.customer_id"
    );
    let customers = sqlx::query_as::<_, Customer>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    let mut orders_by_customer: BTreeMap<i64, Vec<Order>> = BTreeMap::new();
    for order in super::order::find_by_date_range(pool, start, end).await? {
        orders_by_customer.entry(order.customer_id).or_default().push(order);
    }

    Ok(customers
        .into_iter()
        .map(|customer| {
            let orders = orders_by_customer.remove(&customer.customer_id).unwrap_or_default();
            CustomerWithOrders { customer, orders }
        })
        .collect())
}

/// Every customer with its order count in `[start, end)`, busiest first
pub async fn order_count_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<CustomerWithOrderCount>> {
    let rows = sqlx::query_as::<_, CustomerWithOrderCount>(
        "SELECT c.customer_id, c.name, c.phone, c.email, c.created_at, c.updated_at, COUNT(o.order_id) AS orders_count FROM customers c LEFT JOIN orders o ON o.customer_id = c.customer_id AND o.order_date >= ?1 AND o.order_date < ?2 GROUP BY c.customer_id ORDER BY orders_count DESC, c.customer_id",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ── Counters ────────────────────────────────────────────────────────

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_with_orders(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT customer_id) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_without_orders(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM customers c WHERE NOT EXISTS (SELECT 1 FROM orders o WHERE o.customer_id = c.customer_id)",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Customers with more than one order
pub async fn count_repeat_customers(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM (SELECT customer_id FROM orders GROUP BY customer_id HAVING COUNT(*) > 1)",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn count_registered_since(pool: &SqlitePool, since: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE created_at >= ?")
        .bind(since)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ── Aggregates ──────────────────────────────────────────────────────

/// Order aggregates for one customer; `NotFound` for an unknown id
pub async fn customer_stats(pool: &SqlitePool, id: i64) -> RepoResult<CustomerStats> {
    if !exists(pool, id).await? {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }

    let row = sqlx::query_as::<_, StatsRow>(
        "SELECT COUNT(*) AS total_orders, COALESCE(SUM(order_total_cents), 0) AS total_cents, MIN(order_date) AS first_order_date, MAX(order_date) AS last_order_date FROM orders WHERE customer_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    let by_status: Vec<(OrderStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM orders WHERE customer_id = ? GROUP BY status")
            .bind(id)
            .fetch_all(pool)
            .await?;
    let mut status_counts = StatusCounts::default();
    for (status, count) in by_status {
        status_counts.add(status, count);
    }

    Ok(CustomerStats {
        total_orders: row.total_orders,
        total_spent: from_cents(row.total_cents),
        avg_order_value: (row.total_orders > 0).then(|| average_cents(row.total_cents, row.total_orders)),
        first_order_date: row.first_order_date,
        last_order_date: row.last_order_date,
        status_counts,
    })
}

/// All customers with lifetime spend, biggest spenders first
///
/// Zero-order customers are included with a spend of 0.
pub async fn spend_per_customer(pool: &SqlitePool) -> RepoResult<Vec<CustomerWithSpend>> {
    let sql = format!("{CUSTOMER_WITH_SPEND_SELECT} GROUP BY c.customer_id ORDER BY total_cents DESC, c.customer_id");
    let rows = sqlx::query_as::<_, SpendRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(CustomerWithSpend::from).collect())
}

pub async fn top_spending_customers(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<CustomerWithSpend>> {
    let sql = format!(
        "{CUSTOMER_WITH_SPEND_SELECT} GROUP BY c.customer_id ORDER BY total_cents DESC, c.customer_id LIMIT ?"
    );
    let rows = sqlx::query_as::<_, SpendRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(CustomerWithSpend::from).collect())
}

/// Spend totals for the given ids (all customers when `None`), by id
pub async fn spend_for(pool: &SqlitePool, ids: Option<&[i64]>) -> RepoResult<Vec<CustomerWithSpend>> {
    let rows = match ids {
        Some([]) => Vec::new(),
        Some(ids) => {
            let sql = format!(
                "{CUSTOMER_WITH_SPEND_SELECT} WHERE c.customer_id IN ({}) GROUP BY c.customer_id ORDER BY c.customer_id",
                placeholders(ids.len())
            );
            let mut query = sqlx::query_as::<_, SpendRow>(&sql);
            for id in ids {
                query = query.bind(id);
            }
            query.fetch_all(pool).await?
        }
        None => {
            let sql = format!("{CUSTOMER_WITH_SPEND_SELECT} GROUP BY c.customer_id ORDER BY c.customer_id");
            sqlx::query_as::<_, SpendRow>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows.into_iter().map(CustomerWithSpend::from).collect())
}

/// Partition every customer into exactly one spend tier
pub async fn customer_segmentation(pool: &SqlitePool) -> RepoResult<CustomerSegmentation> {
    let sql = format!("{CUSTOMER_WITH_SPEND_SELECT} GROUP BY c.customer_id ORDER BY total_cents DESC, c.customer_id");
    let rows = sqlx::query_as::<_, SpendRow>(&sql).fetch_all(pool).await?;

    let mut segmentation = CustomerSegmentation::default();
    for row in rows {
        let cents = row.total_cents;
        let tier = if cents > HIGH_VALUE_CENTS {
            &mut segmentation.high_value
        } else if cents >= MEDIUM_VALUE_CENTS {
            &mut segmentation.medium_value
        } else if cents > 0 {
            &mut segmentation.low_value
        } else {
            &mut segmentation.new
        };
        tier.push(row.into());
    }
    Ok(segmentation)
}

/// Share of customers with at least one order, in percent (0 with no customers)
pub async fn customer_retention_rate(pool: &SqlitePool) -> RepoResult<f64> {
    let total = count_all(pool).await?;
    let with_orders = count_with_orders(pool).await?;
    Ok(shared::util::percentage(with_orders, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testing::{seed_customer, seed_order, test_pool};

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;
        let data = CustomerCreate {
            name: "Budi".into(),
            phone: "0811".into(),
            email: "budi@example.com".into(),
        };
        let created = create(&pool, &data, 1_000).await.unwrap();
        assert_eq!(created.name, "Budi");
        assert_eq!(created.created_at, 1_000);

        let by_phone = find_by_phone(&pool, "0811").await.unwrap().unwrap();
        assert_eq!(by_phone.customer_id, created.customer_id);
        let by_email = find_by_email(&pool, "budi@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.customer_id, created.customer_id);
        assert!(find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let pool = test_pool().await;
        seed_customer(&pool, "A", "0811", "a@x.com", 0).await;
        let data = CustomerCreate {
            name: "B".into(),
            phone: "0811".into(),
            email: "b@x.com".into(),
        };
        let err = create(&pool, &data, 0).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_availability_excludes_self() {
        let pool = test_pool().await;
        let id = seed_customer(&pool, "A", "0811", "a@x.com", 0).await;
        assert!(!is_phone_available(&pool, "0811", None).await.unwrap());
        assert!(is_phone_available(&pool, "0811", Some(id)).await.unwrap());
        assert!(is_phone_available(&pool, "0899", None).await.unwrap());
        assert!(!is_email_available(&pool, "a@x.com", None).await.unwrap());
        assert!(is_email_available(&pool, "a@x.com", Some(id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = test_pool().await;
        let id = seed_customer(&pool, "A", "0811", "a@x.com", 0).await;
        let changes = CustomerUpdate {
            name: Some("Ani".into()),
            ..Default::default()
        };
        let updated = update(&pool, id, &changes, 5).await.unwrap();
        assert_eq!(updated.name, "Ani");
        assert_eq!(updated.phone, "0811");
        assert_eq!(updated.updated_at, 5);

        let err = update(&pool, 999, &changes, 5).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_orders() {
        let pool = test_pool().await;
        let id = seed_customer(&pool, "A", "0811", "a@x.com", 0).await;
        seed_order(&pool, id, 1000, "pending", 0).await;
        seed_order(&pool, id, 2000, "paid", 0).await;

        delete(&pool, id).await.unwrap();
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orders, 0);
        assert!(matches!(delete(&pool, id).await.unwrap_err(), RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_customer_stats() {
        let pool = test_pool().await;
        let id = seed_customer(&pool, "A", "0811", "a@x.com", 0).await;
        seed_order(&pool, id, 1000, "pending", 300).await;
        seed_order(&pool, id, 2000, "paid", 100).await;
        seed_order(&pool, id, 3000, "paid", 200).await;

        let stats = customer_stats(&pool, id).await.unwrap();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_spent, 60.0);
        assert_eq!(stats.avg_order_value, Some(20.0));
        assert_eq!(stats.first_order_date, Some(100));
        assert_eq!(stats.last_order_date, Some(300));
        assert_eq!(stats.status_counts.paid, 2);
        assert_eq!(stats.status_counts.pending, 1);
    }

    #[tokio::test]
    async fn test_customer_stats_without_orders() {
        let pool = test_pool().await;
        let id = seed_customer(&pool, "A", "0811", "a@x.com", 0).await;
        let stats = customer_stats(&pool, id).await.unwrap();
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_spent, 0.0);
        assert_eq!(stats.avg_order_value, None);
        assert_eq!(stats.first_order_date, None);

        let err = customer_stats(&pool, 999).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_top_spending_includes_zero_order_customers() {
        let pool = test_pool().await;
        let a = seed_customer(&pool, "A", "01", "a@x.com", 0).await;
        let b = seed_customer(&pool, "B", "02", "b@x.com", 0).await;
        let c = seed_customer(&pool, "C", "03", "c@x.com", 0).await;
        seed_order(&pool, b, 5000, "paid", 0).await;
        seed_order(&pool, c, 5000, "paid", 0).await;

        let top = top_spending_customers(&pool, 10).await.unwrap();
        let ids: Vec<i64> = top.iter().map(|c| c.customer.customer_id).collect();
        // tie on spend broken by id
        assert_eq!(ids, vec![b, c, a]);
        assert_eq!(top[2].total_spent, 0.0);
        assert_eq!(top[2].orders_count, 0);

        assert_eq!(top_spending_customers(&pool, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_segmentation_boundaries() {
        let pool = test_pool().await;
        let high = seed_customer(&pool, "High", "01", "h@x.com", 0).await;
        let top_medium = seed_customer(&pool, "TopMedium", "02", "tm@x.com", 0).await;
        let low_medium = seed_customer(&pool, "LowMedium", "03", "lm@x.com", 0).await;
        let low = seed_customer(&pool, "Low", "04", "l@x.com", 0).await;
        let new = seed_customer(&pool, "New", "05", "n@x.com", 0).await;

        seed_order(&pool, high, HIGH_VALUE_CENTS + 1, "paid", 0).await;
        seed_order(&pool, top_medium, HIGH_VALUE_CENTS, "paid", 0).await;
        seed_order(&pool, low_medium, MEDIUM_VALUE_CENTS, "paid", 0).await;
        seed_order(&pool, low, MEDIUM_VALUE_CENTS - 1, "paid", 0).await;

        let seg = customer_segmentation(&pool).await.unwrap();
        fn ids(tier: &[CustomerWithSpend]) -> Vec<i64> {
            tier.iter().map(|c| c.customer.customer_id).collect()
        }
        assert_eq!(ids(&seg.high_value), vec![high]);
        assert_eq!(ids(&seg.medium_value), vec![top_medium, low_medium]);
        assert_eq!(ids(&seg.low_value), vec![low]);
        assert_eq!(ids(&seg.new), vec![new]);
        assert_eq!(seg.medium_value[0].total_spent, 1_000_000.0);
        assert_eq!(seg.medium_value[1].total_spent, 100_000.0);
    }

    #[tokio::test]
    async fn test_retention_rate() {
        let pool = test_pool().await;
        assert_eq!(customer_retention_rate(&pool).await.unwrap(), 0.0);

        let a = seed_customer(&pool, "A", "01", "a@x.com", 0).await;
        seed_customer(&pool, "B", "02", "b@x.com", 0).await;
        seed_customer(&pool, "C", "03", "c@x.com", 0).await;
        seed_order(&pool, a, 100, "paid", 0).await;
        seed_order(&pool, a, 100, "paid", 0).await;

        assert_eq!(customer_retention_rate(&pool).await.unwrap(), 33.33);
        assert_eq!(count_with_orders(&pool).await.unwrap(), 1);
        assert_eq!(count_without_orders(&pool).await.unwrap(), 2);
        assert_eq!(count_repeat_customers(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bulk_update_rolls_back_on_duplicate() {
        let pool = test_pool().await;
        let a = seed_customer(&pool, "A", "01", "a@x.com", 0).await;
        let b = seed_customer(&pool, "B", "02", "b@x.com", 0).await;

        // Same phone on two rows: the second UPDATE violates UNIQUE
        let changes = CustomerUpdate {
            name: Some("Renamed".into()),
            phone: Some("09".into()),
            ..Default::default()
        };
        let err = bulk_update(&pool, &[a, b], &changes, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let a_after = get(&pool, a).await.unwrap();
        assert_eq!(a_after.name, "A");
        assert_eq!(a_after.phone, "01");

        let ok = CustomerUpdate {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        assert_eq!(bulk_update(&pool, &[a, b], &ok, 1).await.unwrap(), 2);
        assert_eq!(get(&pool, b).await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_bulk_delete() {
        let pool = test_pool().await;
        let a = seed_customer(&pool, "A", "01", "a@x.com", 0).await;
        let b = seed_customer(&pool, "B", "02", "b@x.com", 0).await;
        seed_customer(&pool, "C", "03", "c@x.com", 0).await;
        assert_eq!(bulk_delete(&pool, &[a, b, 999]).await.unwrap(), 2);
        assert_eq!(count_all(&pool).await.unwrap(), 1);
        assert_eq!(bulk_delete(&pool, &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listings() {
        let pool = test_pool().await;
        let a = seed_customer(&pool, "Andi", "0811", "andi@x.com", 10).await;
        let b = seed_customer(&pool, "Budi", "0822", "budi@x.com", 20).await;
        seed_customer(&pool, "Cici", "0833", "cici@y.com", 30).await;
        seed_order(&pool, a, 100, "paid", 1_000).await;
        seed_order(&pool, b, 100, "pending", 5_000).await;
        seed_order(&pool, b, 100, "pending", 6_000).await;

        let found = search(&pool, "x.com").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(recent(&pool, 1).await.unwrap()[0].name, "Cici");
        assert_eq!(with_no_orders(&pool).await.unwrap().len(), 1);

        let with = with_orders(&pool).await.unwrap();
        assert_eq!(with[0].customer.customer_id, b);
        assert_eq!(with[0].orders_count, 2);

        let paid = by_order_status(&pool, OrderStatus::Paid).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].customer_id, a);

        let ranged = with_orders_between(&pool, 4_000, 7_000).await.unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].orders.len(), 2);

        let counts = order_count_between(&pool, 0, 2_000).await.unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].customer.customer_id, a);
        assert_eq!(counts[0].orders_count, 1);

        let (page, total) = list_paginated(&pool, 1, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].customer.name, "Cici");

        assert_eq!(count_registered_since(&pool, 20).await.unwrap(), 2);
    }
}
