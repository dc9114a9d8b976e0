//! Request context carrying the authenticated user.

use serde::{Deserialize, Serialize};

use saasboard_core::types::{TenantId, UserId};
use saasboard_entity::UserRole;

/// Who is acting on the current request.
///
/// Built from verified token claims by the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's tenant.
    pub tenant_id: TenantId,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// Login email.
    pub email: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, tenant_id: TenantId, role: UserRole, email: String) -> Self {
        Self {
            user_id,
            tenant_id,
            role,
            email,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}
