//! Customer entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use saasboard_core::AppError;
use saasboard_core::types::{CustomerId, SortOrder, TenantId};

/// Lifecycle status of a customer account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "customer_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerStatus {
    /// Paying, active customer.
    #[default]
    Active,
    /// Paused or dormant.
    Inactive,
    /// Cancelled.
    Churned,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Churned => "CHURNED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CustomerStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "CHURNED" => Ok(Self::Churned),
            _ => Err(AppError::validation(format!(
                "Invalid customer status: '{s}'. Expected one of: ACTIVE, INACTIVE, CHURNED"
            ))),
        }
    }
}

/// A customer record owned by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer identifier.
    pub id: CustomerId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Company name.
    pub company: Option<String>,
    /// Account status.
    pub status: CustomerStatus,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCustomer {
    /// Contact name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Contact email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Company name.
    #[validate(length(max = 100))]
    pub company: Option<String>,
    /// Initial status; defaults to [`CustomerStatus::Active`].
    pub status: Option<CustomerStatus>,
}

/// Column a customer list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSortField {
    Name,
    Email,
    Company,
    Status,
    #[default]
    CreatedAt,
}

impl CustomerSortField {
    /// Maps a `sortBy` query value; unknown or missing fields sort by creation time.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("name") => Self::Name,
            Some("email") => Self::Email,
            Some("company") => Self::Company,
            Some("status") => Self::Status,
            _ => Self::CreatedAt,
        }
    }

    /// Column name in the `customers` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Filter and ordering for a customer list.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring over name, email, and company.
    pub search: Option<String>,
    /// Only customers with this status.
    pub status: Option<CustomerStatus>,
    /// Sort column.
    pub sort_by: CustomerSortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl CustomerFilter {
    /// The search term, trimmed, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
