//! Listing records as the stores return them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row from the `property_managements` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyManagement {
    /// Primary key.
    pub id: i64,
    /// Name shown to visitors.
    pub display_name: String,
    /// Base URL that listing ids are appended to.
    #[serde(default)]
    pub listing_item_url: Option<String>,
    /// Logo image URL.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Brand colour (CSS colour string).
    #[serde(default)]
    pub accent_color: Option<String>,
    /// Text colour used on top of the brand colour.
    #[serde(default)]
    pub accent_color_foreground: Option<String>,
}

/// One entry of a listing's photo gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPhoto {
    /// Image URL; may be missing or empty in scraped data.
    #[serde(default)]
    pub url: Option<String>,
}

/// A listing joined with its property management.
///
/// Every attribute except the id may be null in the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    /// Listing id, unique within its property management.
    pub listable_uid: String,
    /// Single-line postal address.
    #[serde(default)]
    pub full_address: Option<String>,
    /// Street line.
    #[serde(default)]
    pub address_address1: Option<String>,
    /// Unit line.
    #[serde(default)]
    pub address_address2: Option<String>,
    /// City, free text.
    #[serde(default)]
    pub address_city: Option<String>,
    /// Headline written by the property management.
    #[serde(default)]
    pub marketing_title: Option<String>,
    /// Thumbnail for result cards.
    #[serde(default)]
    pub default_photo_thumbnail_url: Option<String>,
    /// Monthly rent.
    #[serde(default)]
    pub market_rent: Option<f64>,
    /// Security deposit.
    #[serde(default)]
    pub deposit: Option<f64>,
    /// Floor area.
    #[serde(default)]
    pub square_feet: Option<f64>,
    /// Bedroom count.
    #[serde(default)]
    pub bedrooms: Option<i32>,
    /// Bathroom count.
    #[serde(default)]
    pub bathrooms: Option<i32>,
    /// Dogs allowed.
    #[serde(default)]
    pub dogs: Option<bool>,
    /// Cats allowed.
    #[serde(default)]
    pub cats: Option<bool>,
    /// Move-in date.
    #[serde(default)]
    pub available_date: Option<DateTime<Utc>>,
    /// Set once the listing is taken down.
    #[serde(default)]
    pub unlisted_at: Option<DateTime<Utc>>,
    /// Photo gallery.
    #[serde(default)]
    pub photos: Vec<ListingPhoto>,
    /// Owning property management.
    pub property_management: PropertyManagement,
}

/// One page of search results plus the exact number of matching rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    /// Rows inside the requested window, in query order.
    pub rows: Vec<ListingRow>,
    /// Number of rows matching the predicates, ignoring the window.
    pub total_count: u64,
}

/// Market rent statistics for one bedroom count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BedroomStats {
    /// Bedroom count the row aggregates.
    pub bedrooms: i32,
    /// Mean market rent.
    pub avg_market_rent: Option<f64>,
    /// Median market rent.
    pub median_market_rent: Option<f64>,
    /// Number of listings aggregated.
    pub count: i64,
}

/// Distinct values offered by the search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterChoices {
    /// Cities, sorted.
    pub cities: Vec<String>,
    /// Bedroom counts, ascending.
    pub bedrooms: Vec<i32>,
    /// Bathroom counts, ascending.
    pub bathrooms: Vec<i32>,
}
