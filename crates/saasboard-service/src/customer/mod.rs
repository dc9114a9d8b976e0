//! Tenant-scoped customer management.

pub mod service;

pub use service::CustomerService;
