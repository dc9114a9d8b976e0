//! Login handler.

use axum::Json;
use axum::extract::State;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use saasboard_auth::login_rate_limit_key;
use saasboard_core::error::AppError;
use saasboard_service::validation;

use crate::dto::request::LoginRequest;
use crate::dto::response::LoginResponse;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

const RATE_LIMITED_MESSAGE: &str = "Too many login attempts. Please try again later.";

/// POST /api/auth/login
///
/// The throttle is consulted before the body is parsed, so a throttled
/// client never reaches credential checking.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<ApiJson<LoginRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let key = login_rate_limit_key(&headers);
    let limits = &state.config.rate_limit;
    let decision = state
        .rate_limiter
        .check(&key, limits.login_limit, limits.login_window());

    if !decision.allowed {
        let retry_after = decision.retry_after_secs();
        warn!(key = %key, retry_after, "Login throttled");
        let mut response = ApiError(AppError::rate_limited(RATE_LIMITED_MESSAGE)).into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        return Ok(response);
    }

    let ApiJson(req) = body?;
    validation::validate(&req)?;

    let user = state.authenticator.authenticate(&req.email, &req.password).await?;
    let token = state.jwt_encoder.issue(&user)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token: token.access_token,
        expires_at: token.expires_at,
        user,
    })
    .into_response())
}
