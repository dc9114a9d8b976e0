//! # saasboard-service
//!
//! Business logic for SaaSBoard. Services receive their stores and the
//! notification dispatcher at construction time and take a
//! [`RequestContext`] describing the acting user.

pub mod context;
pub mod customer;
pub mod notification;
pub mod validation;

pub use context::RequestContext;
pub use customer::CustomerService;
pub use notification::{NotificationList, NotificationService};
