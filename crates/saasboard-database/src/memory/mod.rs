//! In-process implementations of the store traits.
//!
//! Used by the integration tests and when no database URL is configured.

mod store;

pub use store::MemoryStore;
