//! Shared value types: typed identifiers and pagination.

pub mod id;
pub mod pagination;

pub use id::{ConnectionId, CustomerId, NotificationId, TenantId, UserId};
pub use pagination::{PageRequest, PageResponse, SortOrder};
