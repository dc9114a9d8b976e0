//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use saasboard_auth::{
    Authenticator, JwtDecoder, JwtEncoder, PasswordAuthenticator, PasswordHasher, RateLimiter,
};
use saasboard_core::config::AppConfig;
use saasboard_database::repositories::{
    CustomerRepository, NotificationRepository, UserRepository,
};
use saasboard_database::{
    CustomerStore, DatabasePool, MemoryStore, NotificationStore, TenantDirectory, UserStore,
};
use saasboard_realtime::{ConnectionRegistry, NotificationDispatcher};
use saasboard_service::{CustomerService, NotificationService};

/// The persistence backends the application runs on.
#[derive(Clone)]
pub struct Stores {
    /// Notification records.
    pub notifications: Arc<dyn NotificationStore>,
    /// User accounts.
    pub users: Arc<dyn UserStore>,
    /// Tenant membership.
    pub tenants: Arc<dyn TenantDirectory>,
    /// Customer records.
    pub customers: Arc<dyn CustomerStore>,
}

impl Stores {
    /// All stores backed by PostgreSQL.
    pub fn postgres(db: &DatabasePool) -> Self {
        let users = Arc::new(UserRepository::new(db.pool().clone()));
        Self {
            notifications: Arc::new(NotificationRepository::new(db.pool().clone())),
            users: users.clone(),
            tenants: users,
            customers: Arc::new(CustomerRepository::new(db.pool().clone())),
        }
    }

    /// All stores backed by one in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            notifications: store.clone(),
            users: store.clone(),
            tenants: store.clone(),
            customers: store,
        }
    }
}

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Access token issuer.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// Access token validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Credential check for login.
    pub authenticator: Arc<dyn Authenticator>,
    /// Login throttle.
    pub rate_limiter: RateLimiter,
    /// Open notification streams.
    pub registry: Arc<ConnectionRegistry>,
    /// Notification service.
    pub notification_service: NotificationService,
    /// Customer service.
    pub customer_service: CustomerService,
}

impl AppState {
    /// Wires services, auth, and the realtime core on top of `stores`.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let authenticator = Arc::new(PasswordAuthenticator::new(
            Arc::clone(&stores.users),
            PasswordHasher::new(),
        ));
        Self::with_authenticator(config, stores, authenticator)
    }

    /// Like [`AppState::new`] with a custom authenticator.
    pub fn with_authenticator(
        config: AppConfig,
        stores: Stores,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = NotificationDispatcher::new(Arc::clone(&registry), stores.tenants);
        let notification_service = NotificationService::new(stores.notifications, dispatcher);
        let customer_service =
            CustomerService::new(stores.customers, notification_service.clone());

        Self {
            jwt_encoder: Arc::new(JwtEncoder::new(&config.auth)),
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            authenticator,
            rate_limiter: RateLimiter::new(config.rate_limit.sweep_interval()),
            registry,
            notification_service,
            customer_service,
            config: Arc::new(config),
        }
    }
}
