//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query parameters for the customer list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerListQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Page size, clamped to 1..=100.
    pub limit: Option<u64>,
    /// Case-insensitive search over name, email, and company.
    pub search: Option<String>,
    /// `ACTIVE`, `INACTIVE` or `CHURNED`.
    pub status: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}
