//! Customer repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use saasboard_core::error::{AppError, ErrorKind};
use saasboard_core::result::AppResult;
use saasboard_core::types::{CustomerId, PageRequest, PageResponse, TenantId};
use saasboard_entity::{Customer, CustomerFilter, NewCustomer};

use crate::store::CustomerStore;

/// Repository for tenant-scoped customer rows.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn create_customer(
        &self,
        tenant_id: TenantId,
        input: NewCustomer,
    ) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, tenant_id, name, email, company, status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(CustomerId::new())
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.company)
        .bind(input.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create customer", e))
    }

    async fn list_customers(
        &self,
        tenant_id: TenantId,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Customer>> {
        const WHERE: &str = "WHERE tenant_id = $1 \
             AND ($2::TEXT IS NULL OR name ILIKE $2 OR email ILIKE $2 OR company ILIKE $2) \
             AND ($3::customer_status IS NULL OR status = $3)";

        let pattern = filter.search_term().map(|s| format!("%{s}%"));

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customers {WHERE}"))
            .bind(tenant_id)
            .bind(&pattern)
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count customers", e)
            })?;

        // Column and direction come from closed enums, never from request text.
        let sql = format!(
            "SELECT * FROM customers {WHERE} \
             ORDER BY {} {} NULLS LAST, created_at DESC \
             LIMIT $4 OFFSET $5",
            filter.sort_by.column(),
            filter.sort_order.as_sql(),
        );
        let items = sqlx::query_as::<_, Customer>(&sql)
            .bind(tenant_id)
            .bind(&pattern)
            .bind(filter.status)
            .bind(page.limit as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list customers", e))?;

        Ok(PageResponse::new(items, page, total.max(0) as u64))
    }
}
