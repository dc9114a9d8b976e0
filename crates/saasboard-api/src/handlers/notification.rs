//! Notification pull API handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use saasboard_core::error::AppError;
use saasboard_core::types::NotificationId;
use saasboard_entity::Notification;
use saasboard_service::NotificationList;

use crate::dto::response::MarkAllReadResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<NotificationList>, ApiError> {
    Ok(Json(state.notification_service.list(&auth).await?))
}

/// PATCH /api/notifications
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(MarkAllReadResponse {
        success: true,
        updated,
    }))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let notification = state
        .notification_service
        .mark_read(&auth, NotificationId::from_uuid(id))
        .await?;
    Ok(Json(notification))
}

/// POST /api/notifications/mock
///
/// Development helper; disabled in production.
pub async fn create_mock(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    if state.config.app.is_production() {
        return Err(AppError::authorization("Not available in production").into());
    }
    let notification = state.notification_service.create_mock(&auth).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}
