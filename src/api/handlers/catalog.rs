//! Catalog handlers: filter choices, bedroom statistics, property managements.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, ListingsError};
use crate::persistence::{BedroomStats, FilterChoices, PropertyManagement};

/// `GET /listings/filters` — Values offered by the search form.
///
/// # Errors
///
/// Returns [`ListingsError`] when any of the lookups fails.
#[utoipa::path(
    get,
    path = "/api/v1/listings/filters",
    tag = "Catalog",
    summary = "Filter choices",
    description = "Distinct cities, bedroom counts and bathroom counts among currently listed rentals.",
    responses(
        (status = 200, description = "Filter choices", body = FilterChoices),
        (status = 500, description = "Listings store failure", body = ErrorResponse),
    )
)]
pub async fn filter_choices(
    State(state): State<AppState>,
) -> Result<Json<FilterChoices>, ListingsError> {
    Ok(Json(state.listing_service.filter_choices().await?))
}

/// `GET /stats/bedrooms` — Rent statistics per bedroom count.
///
/// # Errors
///
/// Returns [`ListingsError`] when the listings store fails.
#[utoipa::path(
    get,
    path = "/api/v1/stats/bedrooms",
    tag = "Catalog",
    summary = "Bedroom statistics",
    description = "Average and median market rent plus listing count for each bedroom count.",
    responses(
        (status = 200, description = "Statistics ordered by bedroom count", body = Vec<BedroomStats>),
        (status = 500, description = "Listings store failure", body = ErrorResponse),
    )
)]
pub async fn bedroom_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<BedroomStats>>, ListingsError> {
    Ok(Json(state.listing_service.bedroom_stats().await?))
}

/// `GET /property-managements` — All property managements.
///
/// # Errors
///
/// Returns [`ListingsError`] when the listings store fails.
#[utoipa::path(
    get,
    path = "/api/v1/property-managements",
    tag = "Catalog",
    summary = "Property managements",
    description = "All property managements, sorted by display name.",
    responses(
        (status = 200, description = "Property managements", body = Vec<PropertyManagement>),
        (status = 500, description = "Listings store failure", body = ErrorResponse),
    )
)]
pub async fn property_managements(
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyManagement>>, ListingsError> {
    Ok(Json(state.listing_service.property_managements().await?))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/listings/filters", get(filter_choices))
        .route("/stats/bedrooms", get(bedroom_stats))
        .route("/property-managements", get(property_managements))
}
