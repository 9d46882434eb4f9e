//! Customer Service - registration, contact uniqueness, import/export and customer metrics

use shared::models::{
    ContactAvailability, Customer, CustomerCreate, CustomerExportRow, CustomerImportFailure,
    CustomerImportReport, CustomerLifetimeMetrics, CustomerOrdersSummary, CustomerOverview,
    CustomerSegmentation, CustomerStats, CustomerUpdate, CustomerWithOrderCount, CustomerWithOrders,
    CustomerWithSpend, OrderStatus, Paginated,
};
use sqlx::SqlitePool;

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::RepoError;
use crate::db::repository::customer as customer_repo;
use crate::utils::time::{Clock, parse_date};
use crate::utils::validation::{
    MAX_KEYWORD_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, validate_email, validate_required_text,
};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Window for [`CustomerService::new_customers_last_30_days`]
pub const NEW_CUSTOMER_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CustomerService {
    pool: SqlitePool,
    clock: Clock,
}

impl CustomerService {
    pub fn new(pool: SqlitePool, clock: Clock) -> Self {
        Self { pool, clock }
    }

    // ── Registration & updates ──────────────────────────────────────

    /// Register a customer: field checks, then phone uniqueness, then email uniqueness
    pub async fn register_customer(&self, data: &CustomerCreate) -> ServiceResult<Customer> {
        let data = CustomerCreate {
            name: data.name.trim().to_string(),
            phone: data.phone.trim().to_string(),
            email: data.email.trim().to_string(),
        };
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&data.phone, "phone", MAX_PHONE_LEN)?;
        validate_email(&data.email)?;

        if !customer_repo::is_phone_available(&self.pool, &data.phone, None).await? {
            return Err(ServiceError::DuplicatePhone(data.phone));
        }
        if !customer_repo::is_email_available(&self.pool, &data.email, None).await? {
            return Err(ServiceError::DuplicateEmail(data.email));
        }

        let customer = customer_repo::create(&self.pool, &data, self.clock.now_millis()).await?;
        tracing::info!(customer_id = customer.customer_id, "Customer registered");
        Ok(customer)
    }

    /// Partial update; a changed phone or email must not belong to another customer
    pub async fn update_customer(&self, id: i64, data: &CustomerUpdate) -> ServiceResult<Customer> {
        if !customer_repo::exists(&self.pool, id).await? {
            return Err(ServiceError::CustomerNotFound(id));
        }
        let data = self.validate_update(Some(id), data).await?;
        let customer = customer_repo::update(&self.pool, id, &data, self.clock.now_millis()).await?;
        tracing::info!(customer_id = id, "Customer updated");
        Ok(customer)
    }

    pub async fn update_phone(&self, id: i64, phone: &str) -> ServiceResult<Customer> {
        let changes = CustomerUpdate {
            phone: Some(phone.to_string()),
            ..Default::default()
        };
        self.update_customer(id, &changes).await
    }

    pub async fn update_email(&self, id: i64, email: &str) -> ServiceResult<Customer> {
        let changes = CustomerUpdate {
            email: Some(email.to_string()),
            ..Default::default()
        };
        self.update_customer(id, &changes).await
    }

    /// Delete a customer together with all of its orders
    pub async fn delete_customer(&self, id: i64) -> ServiceResult<()> {
        customer_repo::delete(&self.pool, id).await.map_err(|err| match err {
            RepoError::NotFound(_) => ServiceError::CustomerNotFound(id),
            other => other.into(),
        })?;
        tracing::info!(customer_id = id, "Customer deleted (orders cascaded)");
        Ok(())
    }

    /// Same changes for every id in one transaction; any conflict rolls back all rows
    pub async fn bulk_update(&self, ids: &[i64], data: &CustomerUpdate) -> ServiceResult<u64> {
        // Uniqueness per row is left to the UNIQUE constraints inside the transaction
        let data = self.validate_update(None, data).await?;
        let affected = customer_repo::bulk_update(&self.pool, ids, &data, self.clock.now_millis()).await?;
        tracing::info!(requested = ids.len(), affected, "Bulk customer update committed");
        Ok(affected)
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> ServiceResult<u64> {
        let affected = customer_repo::bulk_delete(&self.pool, ids).await?;
        tracing::info!(requested = ids.len(), affected, "Bulk customer delete committed");
        Ok(affected)
    }

    /// Trim and validate changed fields; with `exclude_id`, also check uniqueness
    async fn validate_update(&self, exclude_id: Option<i64>, data: &CustomerUpdate) -> ServiceResult<CustomerUpdate> {
        let data = CustomerUpdate {
            name: data.name.as_deref().map(|v| v.trim().to_string()),
            phone: data.phone.as_deref().map(|v| v.trim().to_string()),
            email: data.email.as_deref().map(|v| v.trim().to_string()),
        };
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(phone) = &data.phone {
            validate_required_text(phone, "phone", MAX_PHONE_LEN)?;
        }
        if let Some(email) = &data.email {
            validate_email(email)?;
        }

        if let Some(id) = exclude_id {
            if let Some(phone) = &data.phone {
                if !customer_repo::is_phone_available(&self.pool, phone, Some(id)).await? {
                    return Err(ServiceError::DuplicatePhone(phone.clone()));
                }
            }
            if let Some(email) = &data.email {
                if !customer_repo::is_email_available(&self.pool, email, Some(id)).await? {
                    return Err(ServiceError::DuplicateEmail(email.clone()));
                }
            }
        }
        Ok(data)
    }

    // ── Import / export ─────────────────────────────────────────────

    /// Import records one by one
    ///
    /// Each record is checked for required fields, then phone, then email;
    /// the first failing check is recorded and the batch moves on. There is
    /// no wrapping transaction: imported rows stay even if later ones fail.
    pub async fn import_customers(&self, records: Vec<CustomerCreate>) -> ServiceResult<CustomerImportReport> {
        let mut imported = Vec::new();
        let mut failed = Vec::new();

        for (index, data) in records.into_iter().enumerate() {
            match self.import_one(&data).await {
                Ok(customer) => imported.push(customer),
                Err(ServiceError::Storage(msg)) => return Err(ServiceError::Storage(msg)),
                Err(err) => failed.push(CustomerImportFailure {
                    index,
                    data,
                    error: err.to_string(),
                }),
            }
        }

        tracing::info!(imported = imported.len(), failed = failed.len(), "Customer import finished");
        Ok(CustomerImportReport {
            total_imported: imported.len(),
            total_failed: failed.len(),
            imported,
            failed,
        })
    }

    async fn import_one(&self, data: &CustomerCreate) -> ServiceResult<Customer> {
        if data.name.trim().is_empty() || data.phone.trim().is_empty() || data.email.trim().is_empty() {
            return Err(ServiceError::Validation("Name, phone and email are required".into()));
        }
        if !customer_repo::is_phone_available(&self.pool, &data.phone, None).await? {
            return Err(ServiceError::DuplicatePhone(data.phone.clone()));
        }
        if !customer_repo::is_email_available(&self.pool, &data.email, None).await? {
            return Err(ServiceError::DuplicateEmail(data.email.clone()));
        }
        Ok(customer_repo::create(&self.pool, data, self.clock.now_millis()).await?)
    }

    /// Export rows with order totals, for the given ids or everyone
    pub async fn export(&self, ids: Option<&[i64]>) -> ServiceResult<Vec<CustomerExportRow>> {
        let rows = customer_repo::spend_for(&self.pool, ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| CustomerExportRow {
                customer_id: row.customer.customer_id,
                created_at: self.clock.format_datetime(row.customer.created_at),
                name: row.customer.name,
                phone: row.customer.phone,
                email: row.customer.email,
                total_orders: row.orders_count,
                total_spent: row.total_spent,
            })
            .collect())
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub async fn get_customer(&self, id: i64) -> ServiceResult<Customer> {
        customer_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(id))
    }

    pub async fn all_customers(&self) -> ServiceResult<Vec<CustomerWithOrderCount>> {
        Ok(customer_repo::find_all_with_order_count(&self.pool).await?)
    }

    pub async fn list_customers(&self, page: u32, per_page: u32) -> ServiceResult<Paginated<CustomerWithOrderCount>> {
        let page = page.max(1);
        let (rows, total) = customer_repo::list_paginated(&self.pool, page, per_page).await?;
        Ok(Paginated::new(rows, total, page, per_page))
    }

    pub async fn search(&self, keyword: &str) -> ServiceResult<Vec<Customer>> {
        let keyword = keyword.trim();
        validate_required_text(keyword, "keyword", MAX_KEYWORD_LEN)?;
        Ok(customer_repo::search(&self.pool, keyword).await?)
    }

    pub async fn recent(&self, limit: i64) -> ServiceResult<Vec<Customer>> {
        Ok(customer_repo::recent(&self.pool, limit).await?)
    }

    pub async fn with_no_orders(&self) -> ServiceResult<Vec<Customer>> {
        Ok(customer_repo::with_no_orders(&self.pool).await?)
    }

    pub async fn with_orders(&self) -> ServiceResult<Vec<CustomerWithOrderCount>> {
        Ok(customer_repo::with_orders(&self.pool).await?)
    }

    pub async fn by_order_status(&self, status: &str) -> ServiceResult<Vec<Customer>> {
        let status = status.parse::<OrderStatus>()?;
        Ok(customer_repo::by_order_status(&self.pool, status).await?)
    }

    /// Customers with orders between two inclusive dates, those orders attached
    pub async fn with_orders_between(&self, start_date: &str, end_date: &str) -> ServiceResult<Vec<CustomerWithOrders>> {
        let (start, end) = self.date_bounds(start_date, end_date)?;
        Ok(customer_repo::with_orders_between(&self.pool, start, end).await?)
    }

    pub async fn order_count_between(&self, start_date: &str, end_date: &str) -> ServiceResult<Vec<CustomerWithOrderCount>> {
        let (start, end) = self.date_bounds(start_date, end_date)?;
        Ok(customer_repo::order_count_between(&self.pool, start, end).await?)
    }

    pub async fn is_phone_available(&self, phone: &str) -> ServiceResult<bool> {
        Ok(customer_repo::is_phone_available(&self.pool, phone.trim(), None).await?)
    }

    pub async fn is_email_available(&self, email: &str) -> ServiceResult<bool> {
        Ok(customer_repo::is_email_available(&self.pool, email.trim(), None).await?)
    }

    pub async fn contact_availability(&self, phone: Option<&str>, email: Option<&str>) -> ServiceResult<ContactAvailability> {
        if phone.is_none() && email.is_none() {
            return Err(ServiceError::Validation("phone or email is required".into()));
        }
        let phone_available = match phone {
            Some(phone) => Some(self.is_phone_available(phone).await?),
            None => None,
        };
        let email_available = match email {
            Some(email) => Some(self.is_email_available(email).await?),
            None => None,
        };
        Ok(ContactAvailability {
            phone_available,
            email_available,
        })
    }

    // ── Metrics ─────────────────────────────────────────────────────

    pub async fn customer_stats(&self, id: i64) -> ServiceResult<CustomerStats> {
        customer_repo::customer_stats(&self.pool, id)
            .await
            .map_err(|err| match err {
                RepoError::NotFound(_) => ServiceError::CustomerNotFound(id),
                other => other.into(),
            })
    }

    pub async fn orders_summary(&self, id: i64) -> ServiceResult<CustomerOrdersSummary> {
        let customer = self.get_customer(id).await?;
        let orders_summary = self.customer_stats(id).await?;
        Ok(CustomerOrdersSummary {
            customer,
            orders_summary,
        })
    }

    pub async fn top_spending_customers(&self, limit: i64) -> ServiceResult<Vec<CustomerWithSpend>> {
        Ok(customer_repo::top_spending_customers(&self.pool, limit).await?)
    }

    pub async fn customer_segmentation(&self) -> ServiceResult<CustomerSegmentation> {
        Ok(customer_repo::customer_segmentation(&self.pool).await?)
    }

    pub async fn customer_retention_rate(&self) -> ServiceResult<f64> {
        Ok(customer_repo::customer_retention_rate(&self.pool).await?)
    }

    pub async fn lifetime_value(&self, id: i64) -> ServiceResult<f64> {
        Ok(self.customer_stats(id).await?.total_spent)
    }

    pub async fn average_order_value(&self, id: i64) -> ServiceResult<Option<f64>> {
        Ok(self.customer_stats(id).await?.avg_order_value)
    }

    /// Orders per day between the first and last order
    ///
    /// `None` below two orders; when both fall within the same whole day the
    /// frequency is the order count itself.
    pub async fn order_frequency(&self, id: i64) -> ServiceResult<Option<f64>> {
        Ok(order_frequency(&self.customer_stats(id).await?))
    }

    pub async fn lifetime_metrics(&self, id: i64) -> ServiceResult<CustomerLifetimeMetrics> {
        let stats = self.customer_stats(id).await?;
        Ok(CustomerLifetimeMetrics {
            customer_id: id,
            lifetime_value: stats.total_spent,
            average_order_value: stats.avg_order_value,
            order_frequency: order_frequency(&stats),
        })
    }

    pub async fn repeat_customers(&self) -> ServiceResult<i64> {
        Ok(customer_repo::count_repeat_customers(&self.pool).await?)
    }

    /// Customers registered since the start of the day 30 days ago
    pub async fn new_customers_last_30_days(&self) -> ServiceResult<i64> {
        let (since, _) = self.clock.day_range(self.clock.days_ago(NEW_CUSTOMER_WINDOW_DAYS)?);
        Ok(customer_repo::count_registered_since(&self.pool, since).await?)
    }

    pub async fn overview(&self) -> ServiceResult<CustomerOverview> {
        let total_customers = customer_repo::count_all(&self.pool).await?;
        let with_orders = customer_repo::count_with_orders(&self.pool).await?;
        Ok(CustomerOverview {
            total_customers,
            with_orders,
            without_orders: customer_repo::count_without_orders(&self.pool).await?,
            repeat_customers: self.repeat_customers().await?,
            new_last_30_days: self.new_customers_last_30_days().await?,
            retention_rate: shared::util::percentage(with_orders, total_customers),
        })
    }

    fn date_bounds(&self, start_date: &str, end_date: &str) -> ServiceResult<(i64, i64)> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        if end < start {
            return Err(ServiceError::Validation(format!(
                "end_date {end_date} is before start_date {start_date}"
            )));
        }
        Ok(self.clock.dates_range(start, end))
    }
}

fn order_frequency(stats: &CustomerStats) -> Option<f64> {
    if stats.total_orders < 2 {
        return None;
    }
    let (first, last) = (stats.first_order_date?, stats.last_order_date?);
    let days = (last - first) / MILLIS_PER_DAY;
    if days == 0 {
        return Some(stats.total_orders as f64);
    }
    Some(shared::util::round2(stats.total_orders as f64 / days as f64))
}
