//! Authenticated-user extractors.
//!
//! [`AuthUser`] reads `Authorization: Bearer <jwt>`. [`StreamUser`] also
//! accepts `?token=<jwt>`, since `EventSource` cannot set headers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use saasboard_core::error::AppError;
use saasboard_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;
        Ok(Self(context_from_token(state, token)?))
    }
}

/// Authenticated user for the notification stream.
#[derive(Debug, Clone)]
pub struct StreamUser(pub RequestContext);

impl std::ops::Deref for StreamUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl FromRequestParts<AppState> for StreamUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts)? {
            return Ok(Self(context_from_token(state, token)?));
        }

        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::authentication("Malformed query string"))?;
        let token = query
            .0
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Missing access token"))?;
        Ok(Self(context_from_token(state, &token)?))
    }
}

/// The bearer token, if an `Authorization` header is present.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Some)
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))
}

fn context_from_token(state: &AppState, token: &str) -> Result<RequestContext, AppError> {
    let claims = state.jwt_decoder.decode(token)?;
    Ok(RequestContext::new(
        claims.user_id(),
        claims.tenant_id(),
        claims.role,
        claims.email,
    ))
}
