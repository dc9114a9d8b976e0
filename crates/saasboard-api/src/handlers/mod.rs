//! HTTP handlers, one module per domain.

pub mod auth;
pub mod customer;
pub mod health;
pub mod notification;
pub mod stream;
