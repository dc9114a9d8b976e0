//! Credential verification for the login endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use saasboard_core::AppError;
use saasboard_core::result::AppResult;
use saasboard_database::UserStore;
use saasboard_entity::User;

use crate::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Verifies a login attempt and returns the authenticated user.
///
/// Failures are always [`saasboard_core::error::ErrorKind::Authentication`]
/// with the same message, whether the email or the password was wrong.
#[async_trait]
pub trait Authenticator: Send + Sync + 'static {
    /// Checks `email` and `password`.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;
}

/// Email + Argon2 password authenticator backed by a [`UserStore`].
#[derive(Clone)]
pub struct PasswordAuthenticator {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl std::fmt::Debug for PasswordAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordAuthenticator").finish_non_exhaustive()
    }
}

impl PasswordAuthenticator {
    /// Creates an authenticator over the given user store.
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            debug!("Login for unknown email");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use saasboard_core::error::ErrorKind;
    use saasboard_core::types::{TenantId, UserId};
    use saasboard_database::MemoryStore;
    use saasboard_entity::UserRole;

    fn setup() -> (PasswordAuthenticator, UserId) {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new();
        let user = User {
            id: UserId::new(),
            tenant_id: TenantId::new(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: hasher.hash("s3cret!").unwrap(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        };
        let id = user.id;
        store.insert_user(user).unwrap();
        (PasswordAuthenticator::new(Arc::new(store), hasher), id)
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let (auth, id) = setup();
        let user = auth.authenticate(" Ada@Example.com ", "s3cret!").await.unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let (auth, _) = setup();
        let wrong = auth.authenticate("ada@example.com", "nope").await.unwrap_err();
        let unknown = auth.authenticate("bob@example.com", "s3cret!").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Authentication);
        assert_eq!(wrong.message, unknown.message);
    }
}
