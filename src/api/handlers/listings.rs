//! Listing search handlers: run a search, rewrite a query string.

use axum::extract::rejection::JsonRejection;
use axum::extract::{RawQuery, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{QueryStringRequest, QueryStringResponse, SearchResponse};
use crate::api::extract::ThemePreference;
use crate::app_state::AppState;
use crate::domain::QueryParams;
use crate::error::{ErrorResponse, ListingsError};

/// `GET /listings` — Search listings.
///
/// Every query parameter is optional and malformed values are normalized
/// rather than rejected.
///
/// # Errors
///
/// Returns [`ListingsError`] when the listings store fails.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    summary = "Search listings",
    description = "Filters, sorts and paginates currently listed rentals. Accepts rentMin, rentMax, depositMin, depositMax, sqFtMin, sqFtMax, bedrooms, bathrooms, cities (comma-separated), dogs, cats, availableFrom, availableTo, sort, asc, pageSize and pageNumber.",
    responses(
        (status = 200, description = "One page of results", body = SearchResponse),
        (status = 500, description = "Listings store failure", body = ErrorResponse),
    )
)]
pub async fn search_listings(
    State(state): State<AppState>,
    ThemePreference(theme): ThemePreference,
    RawQuery(query): RawQuery,
) -> Result<Json<SearchResponse>, ListingsError> {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let outcome = state.listing_service.search(&params).await?;
    Ok(Json(SearchResponse::new(outcome, theme, Utc::now())))
}

/// `POST /listings/query-string` — Apply filter updates to a query string.
///
/// # Errors
///
/// Returns [`ListingsError::InvalidRequest`] when the body is not a valid
/// update list.
#[utoipa::path(
    post,
    path = "/api/v1/listings/query-string",
    tag = "Listings",
    summary = "Rewrite a search query string",
    description = "Normalizes the given query string, applies the updates in order and returns the resulting query string. Unrelated keys are preserved.",
    request_body = QueryStringRequest,
    responses(
        (status = 200, description = "Updated query string", body = QueryStringResponse),
        (status = 400, description = "Malformed update list", body = ErrorResponse),
    )
)]
pub async fn build_query_string(
    State(state): State<AppState>,
    payload: Result<Json<QueryStringRequest>, JsonRejection>,
) -> Result<Json<QueryStringResponse>, ListingsError> {
    let Json(req) = payload?;
    let params = QueryParams::parse(&req.query);
    let query = state.listing_service.apply_updates(&params, req.updates);
    Ok(Json(QueryStringResponse { query }))
}

/// Listing search routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/listings", get(search_listings))
        .route("/listings/query-string", post(build_query_string))
}
