//! DashMap-backed store implementing every persistence trait.

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use saasboard_core::AppError;
use saasboard_core::result::AppResult;
use saasboard_core::types::{
    CustomerId, NotificationId, PageRequest, PageResponse, SortOrder, TenantId, UserId,
};
use saasboard_entity::{
    Customer, CustomerFilter, CustomerSortField, NewCustomer, NewNotification, Notification,
    Tenant, User,
};

use crate::store::{CustomerStore, NotificationStore, TenantDirectory, UserStore};

/// Row plus its insertion sequence, used for stable newest-first ordering.
#[derive(Debug, Clone)]
struct Sequenced<T> {
    seq: u64,
    row: T,
}

#[derive(Debug, Default)]
struct Tables {
    tenants: DashMap<TenantId, Tenant>,
    users: DashMap<UserId, User>,
    /// Lowercased email to user; the uniqueness constraint.
    emails: DashMap<String, UserId>,
    notifications: DashMap<NotificationId, Sequenced<Notification>>,
    customers: DashMap<CustomerId, Sequenced<Customer>>,
    seq: AtomicU64,
}

/// In-memory store. Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tenant.
    pub fn insert_tenant(&self, tenant: Tenant) {
        self.tables.tenants.insert(tenant.id, tenant);
    }

    /// Seed a user. The email must be unique, ignoring case.
    pub fn insert_user(&self, user: User) -> AppResult<()> {
        // The email slot is claimed under its shard lock before the row exists.
        match self.tables.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.tables.users.insert(user.id, user);
                Ok(())
            }
        }
    }

    fn next_seq(&self) -> u64 {
        self.tables.seq.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, input: NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: NotificationId::new(),
            title: input.title,
            message: input.message,
            read: false,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        let seq = self.next_seq();
        self.tables.notifications.insert(
            notification.id,
            Sequenced {
                seq,
                row: notification.clone(),
            },
        );
        debug!(notification_id = %notification.id, user_id = %notification.user_id, "Stored notification");
        Ok(notification)
    }

    async fn recent_for_user(&self, user_id: UserId, limit: u64) -> AppResult<Vec<Notification>> {
        let mut rows: Vec<Sequenced<Notification>> = self
            .tables
            .notifications
            .iter()
            .filter(|e| e.row.user_id == user_id)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(rows
            .into_iter()
            .take(limit as usize)
            .map(|s| s.row)
            .collect())
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .tables
            .notifications
            .iter()
            .filter(|e| e.row.user_id == user_id && !e.row.read)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<Notification>> {
        match self.tables.notifications.get_mut(&id) {
            Some(mut entry) if entry.row.user_id == user_id => {
                entry.row.read = true;
                Ok(Some(entry.row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.tables.notifications.iter_mut() {
            if entry.row.user_id == user_id && !entry.row.read {
                entry.row.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.tables.emails.get(&email.to_lowercase()).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.tables.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.users.get(&id).map(|u| u.value().clone()))
    }
}

#[async_trait]
impl TenantDirectory for MemoryStore {
    async fn member_ids(&self, tenant_id: TenantId) -> AppResult<Vec<UserId>> {
        Ok(self
            .tables
            .users
            .iter()
            .filter(|u| u.tenant_id == tenant_id)
            .map(|u| u.id)
            .collect())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn create_customer(
        &self,
        tenant_id: TenantId,
        input: NewCustomer,
    ) -> AppResult<Customer> {
        let customer = Customer {
            id: CustomerId::new(),
            tenant_id,
            name: input.name,
            email: input.email,
            company: input.company,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        let seq = self.next_seq();
        self.tables.customers.insert(
            customer.id,
            Sequenced {
                seq,
                row: customer.clone(),
            },
        );
        Ok(customer)
    }

    async fn list_customers(
        &self,
        tenant_id: TenantId,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Customer>> {
        let needle = filter.search_term().map(str::to_lowercase);
        let matches = |c: &Customer| {
            let text = match &needle {
                None => true,
                Some(n) => {
                    c.name.to_lowercase().contains(n)
                        || c.email.to_lowercase().contains(n)
                        || c
                            .company
                            .as_deref()
                            .is_some_and(|co| co.to_lowercase().contains(n))
                }
            };
            text && filter.status.is_none_or(|s| c.status == s)
        };

        let mut rows: Vec<Sequenced<Customer>> = self
            .tables
            .customers
            .iter()
            .filter(|e| e.row.tenant_id == tenant_id && matches(&e.row))
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            compare_customers(a, b, filter.sort_by, filter.sort_order)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|s| s.row)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }
}

/// Orders two customers on one column. A missing company sorts last either
/// way; creation order is the insertion sequence.
fn compare_customers(
    a: &Sequenced<Customer>,
    b: &Sequenced<Customer>,
    field: CustomerSortField,
    order: SortOrder,
) -> CmpOrdering {
    let (a_seq, b_seq) = (a.seq, b.seq);
    let (a, b) = (&a.row, &b.row);
    let directed = |ord: CmpOrdering| match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    };
    match field {
        CustomerSortField::Name => directed(a.name.cmp(&b.name)),
        CustomerSortField::Email => directed(a.email.cmp(&b.email)),
        CustomerSortField::Status => directed(a.status.cmp(&b.status)),
        CustomerSortField::CreatedAt => directed(a_seq.cmp(&b_seq)),
        CustomerSortField::Company => match (&a.company, &b.company) {
            (Some(x), Some(y)) => directed(x.cmp(y)),
            (Some(_), None) => CmpOrdering::Less,
            (None, Some(_)) => CmpOrdering::Greater,
            (None, None) => CmpOrdering::Equal,
        },
    }
}
