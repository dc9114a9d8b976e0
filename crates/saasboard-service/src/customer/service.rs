//! Customer creation and listing.

use std::sync::Arc;

use tracing::info;

use saasboard_core::result::AppResult;
use saasboard_core::types::{PageRequest, PageResponse};
use saasboard_database::CustomerStore;
use saasboard_entity::{Customer, CustomerFilter, NewCustomer};

use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::validation;

/// Manages the current tenant's customers.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    notifications: NotificationService,
}

impl std::fmt::Debug for CustomerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerService").finish_non_exhaustive()
    }
}

impl CustomerService {
    /// Creates a new customer service.
    pub fn new(store: Arc<dyn CustomerStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Validates and stores a customer, then notifies the acting user.
    pub async fn create(&self, ctx: &RequestContext, input: NewCustomer) -> AppResult<Customer> {
        validation::validate(&input)?;

        let customer = self.store.create_customer(ctx.tenant_id, input).await?;
        info!(
            customer_id = %customer.id,
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            "Customer created"
        );

        self.notifications
            .create_notification(
                "New Customer",
                format!("{} was added as a new customer", customer.name),
                ctx.user_id,
            )
            .await?;

        Ok(customer)
    }

    /// One page of the tenant's customers, filtered and ordered by `filter`.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Customer>> {
        self.store.list_customers(ctx.tenant_id, filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use saasboard_core::error::ErrorKind;
    use saasboard_core::types::{TenantId, UserId};
    use saasboard_database::MemoryStore;
    use saasboard_entity::UserRole;
    use saasboard_realtime::{ConnectionRegistry, NotificationDispatcher};

    fn setup() -> (CustomerService, NotificationService, RequestContext) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher =
            NotificationDispatcher::new(Arc::new(ConnectionRegistry::new()), store.clone());
        let notifications = NotificationService::new(store.clone(), dispatcher);
        let ctx = RequestContext::new(
            UserId::new(),
            TenantId::new(),
            UserRole::Manager,
            "m@example.com".into(),
        );
        (
            CustomerService::new(store, notifications.clone()),
            notifications,
            ctx,
        )
    }

    fn input(name: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.into(),
            email: email.into(),
            company: Some("Acme Corp".into()),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_fires_new_customer_notification() {
        let (customers, notifications, ctx) = setup();
        let customer = customers
            .create(&ctx, input("Jane Doe", "jane@acme.test"))
            .await
            .unwrap();
        assert_eq!(customer.tenant_id, ctx.tenant_id);

        let list = notifications.list(&ctx).await.unwrap();
        assert_eq!(list.unread_count, 1);
        assert_eq!(list.notifications[0].title, "New Customer");
        assert_eq!(
            list.notifications[0].message,
            "Jane Doe was added as a new customer"
        );
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_without_side_effects() {
        let (customers, notifications, ctx) = setup();
        let err = customers
            .create(&ctx, input("", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let details = err.details.unwrap();
        assert!(details["fields"]["name"].is_array());
        assert!(details["fields"]["email"].is_array());

        assert_eq!(notifications.list(&ctx).await.unwrap().unread_count, 0);
        let page = customers
            .list(&ctx, &CustomerFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}
