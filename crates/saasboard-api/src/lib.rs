//! # saasboard-api
//!
//! HTTP API layer for SaaSBoard built on Axum.
//!
//! Provides the REST endpoints, the Server-Sent-Events notification
//! stream, middleware (CORS, request logging), extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::{AppState, Stores};
