//! # saasboard-database
//!
//! Persistence for SaaSBoard. The store traits in [`store`] are what the
//! service layer consumes; [`repositories`] implements them over a
//! PostgreSQL pool and [`memory`] implements them in process for tests and
//! database-less runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{CustomerStore, NotificationStore, TenantDirectory, UserStore};
