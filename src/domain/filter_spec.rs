//! Normalized listing search intent.
//!
//! [`ListingFilterSpec::normalize`] is the parameter normalizer: it turns an
//! untyped [`QueryParams`] into a fully defaulted spec and never fails.
//! [`ListingFilterSpec::to_query_params`] is its inverse, so
//! `normalize(spec.to_query_params()) == spec` for any valid spec.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::coerce::{to_bound, to_flag, to_instant, to_integer_set, to_positive_int, to_text_set};
use super::pagination::PaginationWindow;
use super::query_params::{Overrides, QueryParams, reconstruct};

/// Default number of listings per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query-string keys understood by the normalizer.
pub mod keys {
    /// Minimum monthly rent.
    pub const RENT_MIN: &str = "rentMin";
    /// Maximum monthly rent.
    pub const RENT_MAX: &str = "rentMax";
    /// Minimum deposit.
    pub const DEPOSIT_MIN: &str = "depositMin";
    /// Maximum deposit.
    pub const DEPOSIT_MAX: &str = "depositMax";
    /// Minimum square footage.
    pub const SQ_FT_MIN: &str = "sqFtMin";
    /// Maximum square footage.
    pub const SQ_FT_MAX: &str = "sqFtMax";
    /// Accepted bedroom counts.
    pub const BEDROOMS: &str = "bedrooms";
    /// Accepted bathroom counts.
    pub const BATHROOMS: &str = "bathrooms";
    /// Dogs must be allowed.
    pub const DOGS: &str = "dogs";
    /// Cats must be allowed.
    pub const CATS: &str = "cats";
    /// Accepted cities.
    pub const CITIES: &str = "cities";
    /// Earliest availability date.
    pub const AVAILABLE_FROM: &str = "availableFrom";
    /// Latest availability date.
    pub const AVAILABLE_TO: &str = "availableTo";
    /// Sort column.
    pub const SORT: &str = "sort";
    /// Sort direction (`"true"` for ascending).
    pub const ASC: &str = "asc";
    /// Listings per page.
    pub const PAGE_SIZE: &str = "pageSize";
    /// 1-indexed page number.
    pub const PAGE_NUMBER: &str = "pageNumber";
}

/// Column a search can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Monthly rent.
    #[default]
    MarketRent,
    /// Bedroom count.
    Bedrooms,
    /// Bathroom count.
    Bathrooms,
}

impl SortOption {
    /// Every option, in fallback order: the first one is the default.
    pub const ALL: [Self; 3] = [Self::MarketRent, Self::Bedrooms, Self::Bathrooms];

    /// Wire and column name of this option.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketRent => "market_rent",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
        }
    }

    /// Parses a raw value, substituting the first option for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::ALL.into_iter().find(|opt| opt.as_str() == raw))
            .unwrap_or_default()
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, fully defaulted representation of a listings search.
///
/// Numeric bounds use `0.0` for "not set". Set filters are `None` when
/// unconstrained and never hold an empty set.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilterSpec {
    /// Minimum monthly rent (0 = unset).
    pub rent_min: f64,
    /// Maximum monthly rent (0 = unset).
    pub rent_max: f64,
    /// Minimum deposit (0 = unset).
    pub deposit_min: f64,
    /// Maximum deposit (0 = unset).
    pub deposit_max: f64,
    /// Minimum square footage (0 = unset).
    pub sq_ft_min: f64,
    /// Maximum square footage (0 = unset).
    pub sq_ft_max: f64,
    /// Accepted bedroom counts.
    pub bedrooms: Option<BTreeSet<u32>>,
    /// Accepted bathroom counts.
    pub bathrooms: Option<BTreeSet<u32>>,
    /// Only listings that allow dogs.
    pub dogs_required: bool,
    /// Only listings that allow cats.
    pub cats_required: bool,
    /// Accepted cities.
    pub cities: Option<BTreeSet<String>>,
    /// Earliest availability date (inclusive).
    pub available_from: Option<DateTime<Utc>>,
    /// Latest availability date (inclusive).
    pub available_to: Option<DateTime<Utc>>,
    /// Sort column.
    pub sort: SortOption,
    /// Ascending order when `true`, descending otherwise.
    pub ascending: bool,
    /// Listings per page, in `1..=100`.
    pub page_size: u32,
    /// 1-indexed page number.
    pub page_number: u32,
}

impl Default for ListingFilterSpec {
    fn default() -> Self {
        Self {
            rent_min: 0.0,
            rent_max: 0.0,
            deposit_min: 0.0,
            deposit_max: 0.0,
            sq_ft_min: 0.0,
            sq_ft_max: 0.0,
            bedrooms: None,
            bathrooms: None,
            dogs_required: false,
            cats_required: false,
            cities: None,
            available_from: None,
            available_to: None,
            sort: SortOption::default(),
            ascending: false,
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl ListingFilterSpec {
    /// Builds a spec from raw query parameters. Total over all inputs.
    #[must_use]
    pub fn normalize(params: &QueryParams) -> Self {
        Self {
            rent_min: to_bound(params.first(keys::RENT_MIN)),
            rent_max: to_bound(params.first(keys::RENT_MAX)),
            deposit_min: to_bound(params.first(keys::DEPOSIT_MIN)),
            deposit_max: to_bound(params.first(keys::DEPOSIT_MAX)),
            sq_ft_min: to_bound(params.first(keys::SQ_FT_MIN)),
            sq_ft_max: to_bound(params.first(keys::SQ_FT_MAX)),
            bedrooms: to_integer_set(&params.all(keys::BEDROOMS)),
            bathrooms: to_integer_set(&params.all(keys::BATHROOMS)),
            dogs_required: to_flag(params.first(keys::DOGS)),
            cats_required: to_flag(params.first(keys::CATS)),
            cities: to_text_set(&params.all(keys::CITIES)),
            available_from: to_instant(params.first(keys::AVAILABLE_FROM)),
            available_to: to_instant(params.first(keys::AVAILABLE_TO)),
            sort: SortOption::parse_or_default(params.first(keys::SORT)),
            ascending: to_flag(params.first(keys::ASC)),
            page_size: clamp_page_size(to_positive_int(
                params.first(keys::PAGE_SIZE),
                DEFAULT_PAGE_SIZE,
            )),
            page_number: to_positive_int(params.first(keys::PAGE_NUMBER), 1),
        }
    }

    /// Inclusive row window for the current page.
    #[must_use]
    pub fn window(&self) -> PaginationWindow {
        PaginationWindow::new(self.page_size, self.page_number)
    }

    /// Returns `true` if any filter (not sort or paging) is active.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        let unfiltered = Self {
            sort: self.sort,
            ascending: self.ascending,
            page_size: self.page_size,
            page_number: self.page_number,
            ..Self::default()
        };
        *self != unfiltered
    }

    /// Overrides that write every field of this spec, removing keys that
    /// hold their default value. Paging keys are always written.
    #[must_use]
    pub fn to_overrides(&self) -> Overrides {
        Overrides::new()
            .set_or_remove(keys::RENT_MIN, bound(self.rent_min))
            .set_or_remove(keys::RENT_MAX, bound(self.rent_max))
            .set_or_remove(keys::DEPOSIT_MIN, bound(self.deposit_min))
            .set_or_remove(keys::DEPOSIT_MAX, bound(self.deposit_max))
            .set_or_remove(keys::SQ_FT_MIN, bound(self.sq_ft_min))
            .set_or_remove(keys::SQ_FT_MAX, bound(self.sq_ft_max))
            .set_or_remove(keys::BEDROOMS, self.bedrooms.as_ref())
            .set_or_remove(keys::BATHROOMS, self.bathrooms.as_ref())
            .set_or_remove(keys::DOGS, self.dogs_required.then_some(true))
            .set_or_remove(keys::CATS, self.cats_required.then_some(true))
            .set_or_remove(keys::CITIES, self.cities.as_ref())
            .set_or_remove(keys::AVAILABLE_FROM, self.available_from)
            .set_or_remove(keys::AVAILABLE_TO, self.available_to)
            .set_or_remove(
                keys::SORT,
                (self.sort != SortOption::default()).then_some(self.sort),
            )
            .set_or_remove(keys::ASC, self.ascending.then_some(true))
            .set(keys::PAGE_SIZE, self.page_size)
            .set(keys::PAGE_NUMBER, self.page_number)
    }

    /// Canonical parameter set for this spec.
    #[must_use]
    pub fn to_query_params(&self) -> QueryParams {
        QueryParams::parse(&self.to_query_string())
    }

    /// Canonical URL-encoded query string for this spec.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        reconstruct(&QueryParams::new(), &self.to_overrides())
    }
}

/// Clamps a page size into `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn clamp_page_size(size: u32) -> u32 {
    size.clamp(1, MAX_PAGE_SIZE)
}

fn bound(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}
