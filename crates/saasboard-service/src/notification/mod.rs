//! Notification creation, listing, and read state.

mod samples;
pub mod service;

pub use service::{NotificationList, NotificationService};
