//! # saasboard-entity
//!
//! Domain entity models for SaaSBoard. Every struct in this crate
//! represents a database table row or an input value object. Database
//! entities derive `sqlx::FromRow`.

pub mod customer;
pub mod notification;
pub mod tenant;
pub mod user;

pub use customer::{Customer, CustomerFilter, CustomerSortField, CustomerStatus, NewCustomer};
pub use notification::{NewNotification, Notification};
pub use tenant::Tenant;
pub use user::{User, UserRole};
