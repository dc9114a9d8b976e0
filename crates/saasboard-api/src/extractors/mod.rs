//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{AuthUser, StreamUser};
pub use json::ApiJson;
