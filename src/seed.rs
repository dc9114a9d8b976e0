//! Demo tenant and accounts for database-less runs.

use chrono::Utc;

use saasboard_auth::PasswordHasher;
use saasboard_core::error::AppError;
use saasboard_core::types::{TenantId, UserId};
use saasboard_database::MemoryStore;
use saasboard_entity::{Tenant, User, UserRole};

const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: &[(&str, &str, UserRole)] = &[
    ("Yuki Tanaka", "admin@acme.com", UserRole::Admin),
    ("Sarah Chen", "manager@acme.com", UserRole::Manager),
    ("James Wilson", "member@acme.com", UserRole::Member),
];

/// Seeds "Acme Corporation" with one user per role, all sharing the demo password.
pub fn demo_accounts(store: &MemoryStore) -> Result<(), AppError> {
    let tenant = Tenant {
        id: TenantId::new(),
        name: "Acme Corporation".to_string(),
        created_at: Utc::now(),
    };
    let tenant_id = tenant.id;
    store.insert_tenant(tenant);

    let password_hash = PasswordHasher::new().hash(DEMO_PASSWORD)?;
    for (name, email, role) in DEMO_USERS {
        store.insert_user(User {
            id: UserId::new(),
            tenant_id,
            name: (*name).to_string(),
            email: (*email).to_string(),
            password_hash: password_hash.clone(),
            role: *role,
            created_at: Utc::now(),
        })?;
    }

    tracing::info!(
        users = DEMO_USERS.len(),
        "Seeded demo accounts (password: {})",
        DEMO_PASSWORD
    );
    Ok(())
}
