//! Customer handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use saasboard_core::types::{PageRequest, SortOrder};
use saasboard_entity::{Customer, CustomerFilter, CustomerSortField, NewCustomer};

use crate::dto::request::CustomerListQuery;
use crate::dto::response::CustomerListResponse;
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser};
use crate::state::AppState;

/// GET /api/customers
///
/// An unknown `status` is ignored and an unknown `sortBy` falls back to
/// creation time.
pub async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<CustomerListResponse>, ApiError> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(10));
    let filter = CustomerFilter {
        search: query.search,
        status: query.status.as_deref().and_then(|s| s.parse().ok()),
        sort_by: CustomerSortField::from_query(query.sort_by.as_deref()),
        sort_order: SortOrder::from_query(query.sort_order.as_deref()),
    };
    let result = state.customer_service.list(&auth, &filter, page).await?;
    Ok(Json(result.into()))
}

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state.customer_service.create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}
