//! Search response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::domain::{FilterChip, ListingFilterSpec, PageLinks, PageSummary, Theme};
use crate::persistence::{ListingRow, PropertyManagement};
use crate::service::SearchOutcome;

const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// One listing as shown in search results.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
    /// Listing id within its property management.
    pub listable_uid: String,
    /// Headline.
    pub marketing_title: Option<String>,
    /// Single-line address.
    pub full_address: Option<String>,
    /// Street line.
    pub address_address1: Option<String>,
    /// Unit line.
    pub address_address2: Option<String>,
    /// City.
    pub address_city: Option<String>,
    /// Monthly rent.
    pub market_rent: Option<f64>,
    /// Security deposit.
    pub deposit: Option<f64>,
    /// Floor area.
    pub square_feet: Option<f64>,
    /// Bedroom count.
    pub bedrooms: Option<i32>,
    /// Bathroom count.
    pub bathrooms: Option<i32>,
    /// Dogs allowed.
    pub dogs: Option<bool>,
    /// Cats allowed.
    pub cats: Option<bool>,
    /// Move-in date.
    pub available_date: Option<DateTime<Utc>>,
    /// The move-in date has passed.
    pub available_now: bool,
    /// Thumbnail for the result card.
    pub thumbnail_url: Option<String>,
    /// Gallery photo URLs with blank entries dropped.
    pub photo_urls: Vec<String>,
    /// Listing page on the property management's site.
    pub listing_url: Option<String>,
    /// Map search for the address.
    pub map_url: Option<String>,
    /// Owning property management.
    pub property_management: PropertyManagement,
}

impl ListingDto {
    /// Builds the display form of `row`, evaluating availability at `now`.
    #[must_use]
    pub fn from_row(row: ListingRow, now: DateTime<Utc>) -> Self {
        let listing_url = row
            .property_management
            .listing_item_url
            .as_deref()
            .map(|base| format!("{base}/{}", row.listable_uid));
        let map_url = row.full_address.as_deref().and_then(map_search_url);
        let photo_urls = row
            .photos
            .into_iter()
            .filter_map(|photo| photo.url)
            .filter(|url| !url.trim().is_empty())
            .collect();

        Self {
            available_now: row.available_date.is_some_and(|date| date < now),
            listing_url,
            map_url,
            photo_urls,
            listable_uid: row.listable_uid,
            marketing_title: row.marketing_title,
            full_address: row.full_address,
            address_address1: row.address_address1,
            address_address2: row.address_address2,
            address_city: row.address_city,
            market_rent: row.market_rent,
            deposit: row.deposit,
            square_feet: row.square_feet,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            dogs: row.dogs,
            cats: row.cats,
            available_date: row.available_date,
            thumbnail_url: row.default_photo_thumbnail_url,
            property_management: row.property_management,
        }
    }
}

fn map_search_url(address: &str) -> Option<String> {
    Url::parse_with_params(MAP_SEARCH_URL, &[("api", "1"), ("query", address)])
        .ok()
        .map(String::from)
}

/// Response of `GET /api/v1/listings`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Normalized search.
    pub spec: ListingFilterSpec,
    /// Canonical query string for `spec`.
    pub query: String,
    /// Listings on the requested page.
    pub listings: Vec<ListingDto>,
    /// Page counts and the shown range.
    pub pagination: PageSummary,
    /// Pager query strings.
    pub links: PageLinks,
    /// Active filters with removal links.
    pub chips: Vec<FilterChip>,
    /// Query string that clears every filter, when any is active.
    pub reset_query: Option<String>,
    /// Visitor's theme preference.
    pub theme: Theme,
}

impl SearchResponse {
    /// Assembles the response from a service outcome.
    #[must_use]
    pub fn new(outcome: SearchOutcome, theme: Theme, now: DateTime<Utc>) -> Self {
        Self {
            spec: outcome.spec,
            query: outcome.canonical_query,
            listings: outcome
                .rows
                .into_iter()
                .map(|row| ListingDto::from_row(row, now))
                .collect(),
            pagination: outcome.page,
            links: outcome.links,
            chips: outcome.chips,
            reset_query: outcome.reset_query,
            theme,
        }
    }
}
