//! Typed filter-form updates and the reducer that applies them.
//!
//! Serialized as `{"field": "rentMin", "value": 500}`. Every recognized
//! field has exactly one variant, so unknown fields are rejected at
//! deserialization time instead of being silently carried along.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use super::coerce::to_text_set;
use super::filter_spec::{ListingFilterSpec, SortOption, clamp_page_size};

/// One change to a [`ListingFilterSpec`].
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterUpdate {
    /// Set or clear the minimum rent.
    RentMin(Option<f64>),
    /// Set or clear the maximum rent.
    RentMax(Option<f64>),
    /// Set or clear the minimum deposit.
    DepositMin(Option<f64>),
    /// Set or clear the maximum deposit.
    DepositMax(Option<f64>),
    /// Set or clear the minimum square footage.
    SqFtMin(Option<f64>),
    /// Set or clear the maximum square footage.
    SqFtMax(Option<f64>),
    /// Replace or clear the accepted bedroom counts.
    Bedrooms(Option<BTreeSet<u32>>),
    /// Replace or clear the accepted bathroom counts.
    Bathrooms(Option<BTreeSet<u32>>),
    /// Replace or clear the accepted cities.
    Cities(Option<BTreeSet<String>>),
    /// Require (or stop requiring) that dogs are allowed.
    DogsRequired(bool),
    /// Require (or stop requiring) that cats are allowed.
    CatsRequired(bool),
    /// Set or clear the earliest availability date.
    AvailableFrom(Option<DateTime<Utc>>),
    /// Set or clear the latest availability date.
    AvailableTo(Option<DateTime<Utc>>),
    /// Change the sort column.
    Sort(SortOption),
    /// Change the sort direction.
    Ascending(bool),
    /// Change the page size (clamped to `1..=100`).
    PageSize(u32),
    /// Jump to a page (at least 1).
    PageNumber(u32),
    /// Clear every filter, keeping sort and page size.
    Reset,
}

impl ListingFilterSpec {
    /// Applies one update, preserving the spec invariants.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::RentMin(v) => self.rent_min = bound(v),
            FilterUpdate::RentMax(v) => self.rent_max = bound(v),
            FilterUpdate::DepositMin(v) => self.deposit_min = bound(v),
            FilterUpdate::DepositMax(v) => self.deposit_max = bound(v),
            FilterUpdate::SqFtMin(v) => self.sq_ft_min = bound(v),
            FilterUpdate::SqFtMax(v) => self.sq_ft_max = bound(v),
            FilterUpdate::Bedrooms(v) => self.bedrooms = non_empty(v),
            FilterUpdate::Bathrooms(v) => self.bathrooms = non_empty(v),
            FilterUpdate::Cities(v) => {
                // Re-split so a city containing the list delimiter cannot
                // break the query-string round trip.
                self.cities = v.and_then(|set| {
                    let pieces: Vec<&str> = set.iter().map(String::as_str).collect();
                    to_text_set(&pieces)
                });
            }
            FilterUpdate::DogsRequired(v) => self.dogs_required = v,
            FilterUpdate::CatsRequired(v) => self.cats_required = v,
            FilterUpdate::AvailableFrom(v) => self.available_from = v,
            FilterUpdate::AvailableTo(v) => self.available_to = v,
            FilterUpdate::Sort(v) => self.sort = v,
            FilterUpdate::Ascending(v) => self.ascending = v,
            FilterUpdate::PageSize(v) => self.page_size = clamp_page_size(v),
            FilterUpdate::PageNumber(v) => self.page_number = v.max(1),
            FilterUpdate::Reset => {
                *self = Self {
                    sort: self.sort,
                    ascending: self.ascending,
                    page_size: self.page_size,
                    ..Self::default()
                };
            }
        }
    }

    /// Applies updates in order and returns the resulting spec.
    #[must_use]
    pub fn with_updates(mut self, updates: impl IntoIterator<Item = FilterUpdate>) -> Self {
        for update in updates {
            self.apply(update);
        }
        self
    }
}

fn bound(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

fn non_empty<T: Ord>(set: Option<BTreeSet<T>>) -> Option<BTreeSet<T>> {
    set.filter(|set| !set.is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FilterUpdate {
        let Ok(update) = serde_json::from_str(json) else {
            panic!("invalid update json: {json}");
        };
        update
    }

    #[test]
    fn deserializes_tagged_updates() {
        assert_eq!(
            parse(r#"{"field":"rentMin","value":500}"#),
            FilterUpdate::RentMin(Some(500.0))
        );
        assert_eq!(
            parse(r#"{"field":"bedrooms","value":[3,2]}"#),
            FilterUpdate::Bedrooms(Some([2, 3].into()))
        );
        assert_eq!(
            parse(r#"{"field":"sort","value":"bathrooms"}"#),
            FilterUpdate::Sort(SortOption::Bathrooms)
        );
        assert_eq!(parse(r#"{"field":"reset"}"#), FilterUpdate::Reset);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = serde_json::from_str::<FilterUpdate>(r#"{"field":"pool","value":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn zero_and_negative_bounds_clear_the_filter() {
        let spec = ListingFilterSpec::default().with_updates([
            FilterUpdate::RentMin(Some(900.0)),
            FilterUpdate::RentMax(Some(-1.0)),
            FilterUpdate::RentMin(Some(0.0)),
        ]);
        assert_eq!(spec.rent_min, 0.0);
        assert_eq!(spec.rent_max, 0.0);
    }

    #[test]
    fn empty_sets_become_absent() {
        let spec = ListingFilterSpec::default().with_updates([
            FilterUpdate::Bedrooms(Some(BTreeSet::new())),
            FilterUpdate::Cities(Some(["".to_string(), "null".to_string()].into())),
        ]);
        assert!(spec.bedrooms.is_none());
        assert!(spec.cities.is_none());
    }

    #[test]
    fn paging_updates_are_clamped() {
        let spec = ListingFilterSpec::default().with_updates([
            FilterUpdate::PageSize(0),
            FilterUpdate::PageNumber(0),
        ]);
        assert_eq!(spec.page_size, 1);
        assert_eq!(spec.page_number, 1);

        let spec = ListingFilterSpec::default().with_updates([FilterUpdate::PageSize(500)]);
        assert_eq!(spec.page_size, 100);
    }

    #[test]
    fn reset_keeps_sort_and_page_size() {
        let spec = ListingFilterSpec::default().with_updates([
            FilterUpdate::CatsRequired(true),
            FilterUpdate::Sort(SortOption::Bedrooms),
            FilterUpdate::PageSize(25),
            FilterUpdate::PageNumber(4),
            FilterUpdate::Reset,
        ]);
        assert!(!spec.has_filters());
        assert_eq!(spec.sort, SortOption::Bedrooms);
        assert_eq!(spec.page_size, 25);
        assert_eq!(spec.page_number, 1);
    }

    #[test]
    fn reduced_spec_round_trips() {
        let spec = ListingFilterSpec::default().with_updates([
            FilterUpdate::Cities(Some(["Eureka".to_string()].into())),
            FilterUpdate::DepositMax(Some(1500.0)),
            FilterUpdate::Ascending(true),
        ]);
        assert_eq!(ListingFilterSpec::normalize(&spec.to_query_params()), spec);
    }

    #[test]
    fn nanosecond_date_update_round_trips() {
        let Ok(to) = DateTime::parse_from_rfc3339("2024-05-01T10:30:00.5000001Z") else {
            panic!("valid instant");
        };
        let spec = ListingFilterSpec::default()
            .with_updates([FilterUpdate::AvailableTo(Some(to.with_timezone(&Utc)))]);
        assert_eq!(ListingFilterSpec::normalize(&spec.to_query_params()), spec);
    }
}
