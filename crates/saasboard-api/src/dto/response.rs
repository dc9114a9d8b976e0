//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use saasboard_core::types::PageResponse;
use saasboard_entity::{Customer, User};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Open notification streams.
    pub connections: usize,
    /// Users with at least one open stream.
    pub online_users: usize,
    /// Client identities currently tracked by the login throttle.
    pub rate_limited_keys: usize,
}

/// Login response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Access token expiration.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

/// Result of marking every notification read.
#[derive(Debug, Clone, Serialize)]
pub struct MarkAllReadResponse {
    /// Always `true`.
    pub success: bool,
    /// Notifications changed.
    pub updated: u64,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Customer list response.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerListResponse {
    /// Customers on this page.
    pub customers: Vec<Customer>,
    /// Page metadata.
    pub pagination: PaginationMeta,
}

impl From<PageResponse<Customer>> for CustomerListResponse {
    fn from(page: PageResponse<Customer>) -> Self {
        Self {
            pagination: PaginationMeta {
                page: page.page,
                limit: page.limit,
                total: page.total,
                total_pages: page.total_pages,
            },
            customers: page.items,
        }
    }
}
