//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{catalog, listings, preferences, system};

/// Generates the OpenApi object.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "rental-listings",
        description = "Search and pagination API for Humboldt County rental listings."
    ),
    paths(
        system::health_handler,
        listings::search_listings,
        listings::build_query_string,
        catalog::filter_choices,
        catalog::bedroom_stats,
        catalog::property_managements,
        preferences::get_theme,
        preferences::put_theme,
    ),
    tags(
        (name = "Listings", description = "Listing search"),
        (name = "Catalog", description = "Filter choices and statistics"),
        (name = "Preferences", description = "Visitor preferences"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
