//! Route definitions for the SaaSBoard HTTP API.
//!
//! Routes are grouped by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, patch, post};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with every route, bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(notification_routes())
        .merge(customer_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Login is the only unauthenticated write.
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(handlers::auth::login))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications)
                .patch(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
        .route(
            "/notifications/mock",
            post(handlers::notification::create_mock),
        )
        .route("/notifications/stream", get(handlers::stream::stream))
}

fn customer_routes() -> Router<AppState> {
    Router::new().route(
        "/customers",
        get(handlers::customer::list_customers).post(handlers::customer::create_customer),
    )
}
