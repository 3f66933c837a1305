//! Listing service: runs searches and catalog lookups against a store.

use std::sync::Arc;

use crate::domain::{
    FilterChip, FilterUpdate, ListingFilterSpec, ListingQuery, PageLinks, PageSummary,
    QueryParams, filter_chips, reconstruct,
};
use crate::error::ListingsError;
use crate::persistence::{
    BedroomStats, FilterChoices, ListingRow, ListingStore, PropertyManagement,
};

/// Everything one search request produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Normalized search intent.
    pub spec: ListingFilterSpec,
    /// Canonical query string for `spec`.
    pub canonical_query: String,
    /// Rows on the requested page.
    pub rows: Vec<ListingRow>,
    /// Page counts and shown range.
    pub page: PageSummary,
    /// Pager links.
    pub links: PageLinks,
    /// One removable chip per active filter.
    pub chips: Vec<FilterChip>,
    /// Query string with every filter cleared; `None` when none is active.
    pub reset_query: Option<String>,
}

/// Orchestration layer between the HTTP handlers and a [`ListingStore`].
///
/// Stateless: every call builds its spec and query from the request and
/// makes exactly the store round trips it needs.
#[derive(Debug, Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
}

impl ListingService {
    /// Creates a new `ListingService` over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Normalizes `params`, fetches the requested page and derives the
    /// pagination metadata, pager links and filter chips.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged; no retry is attempted.
    pub async fn search(&self, params: &QueryParams) -> Result<SearchOutcome, ListingsError> {
        let spec = ListingFilterSpec::normalize(params);
        tracing::debug!(?spec, "normalized listing search");

        let query = ListingQuery::build(&spec);
        let result = self.store.search(&query).await?;
        tracing::debug!(
            total = result.total_count,
            returned = result.rows.len(),
            "listing search complete"
        );

        let page = PageSummary::derive(spec.page_size, spec.page_number, result.total_count);
        let canonical = spec.to_query_params();
        let links = PageLinks::new(&canonical, &page);
        let chips = filter_chips(&spec);
        let reset_query = spec.has_filters().then(|| {
            spec.clone()
                .with_updates([FilterUpdate::Reset])
                .to_query_string()
        });

        Ok(SearchOutcome {
            canonical_query: canonical.to_query_string(),
            spec,
            rows: result.rows,
            page,
            links,
            chips,
            reset_query,
        })
    }

    /// Applies `updates` to the filters encoded in `params` and returns the
    /// resulting query string. Keys the search does not use are kept.
    #[must_use]
    pub fn apply_updates(&self, params: &QueryParams, updates: Vec<FilterUpdate>) -> String {
        let spec = ListingFilterSpec::normalize(params).with_updates(updates);
        reconstruct(params, &spec.to_overrides())
    }

    /// Distinct cities, bedroom counts and bathroom counts, looked up
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first store error.
    pub async fn filter_choices(&self) -> Result<FilterChoices, ListingsError> {
        let (cities, bedrooms, bathrooms) = tokio::try_join!(
            self.store.distinct_cities(),
            self.store.distinct_bedrooms(),
            self.store.distinct_bathrooms(),
        )?;
        Ok(FilterChoices {
            cities,
            bedrooms,
            bathrooms,
        })
    }

    /// Market rent statistics per bedroom count.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn bedroom_stats(&self) -> Result<Vec<BedroomStats>, ListingsError> {
        self.store.bedroom_stats().await
    }

    /// Property managements sorted by display name.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn property_managements(&self) -> Result<Vec<PropertyManagement>, ListingsError> {
        self.store.property_managements().await
    }
}
