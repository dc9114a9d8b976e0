//! Store traits consumed by the service and realtime layers.
//!
//! Each trait is object safe so services hold `Arc<dyn ...>` and tests can
//! swap PostgreSQL for [`crate::memory::MemoryStore`].

use async_trait::async_trait;

use saasboard_core::result::AppResult;
use saasboard_core::types::{NotificationId, PageRequest, PageResponse, TenantId, UserId};
use saasboard_entity::{
    Customer, CustomerFilter, NewCustomer, NewNotification, Notification, User,
};

/// Persistence for notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Insert a new, unread notification and return the stored row.
    async fn create_notification(&self, input: NewNotification) -> AppResult<Notification>;

    /// Latest notifications for a user, newest first.
    async fn recent_for_user(&self, user_id: UserId, limit: u64) -> AppResult<Vec<Notification>>;

    /// Number of unread notifications for a user.
    async fn count_unread(&self, user_id: UserId) -> AppResult<u64>;

    /// Mark one notification read. Returns `None` when it does not exist or
    /// belongs to someone else.
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<Notification>>;

    /// Mark every unread notification of a user read. Returns rows changed.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;
}

/// Lookup of user accounts for authentication.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by login email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;
}

/// Tenant membership queries.
#[async_trait]
pub trait TenantDirectory: Send + Sync + 'static {
    /// Ids of every user belonging to the tenant.
    async fn member_ids(&self, tenant_id: TenantId) -> AppResult<Vec<UserId>>;
}

/// Persistence for tenant-scoped customer records.
#[async_trait]
pub trait CustomerStore: Send + Sync + 'static {
    /// Insert a customer for the tenant.
    async fn create_customer(&self, tenant_id: TenantId, input: NewCustomer)
    -> AppResult<Customer>;

    /// One page of the tenant's customers matching `filter`, in its order.
    /// Rows that tie on the sort column come newest first.
    async fn list_customers(
        &self,
        tenant_id: TenantId,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Customer>>;
}
