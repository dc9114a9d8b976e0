//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use saasboard_core::types::TenantId;

/// An organization owning users and customers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: TenantId,
    /// Organization name.
    pub name: String,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
}
