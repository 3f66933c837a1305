//! Persistence layer: the listings collection.
//!
//! [`ListingStore`] is the seam between the search logic and whatever holds
//! the listings. Stores receive declarative [`ListingQuery`] records and
//! translate them into their own query language:
//!
//! - [`postgres::PostgresListingStore`]: `sqlx::PgPool` against the schema
//!   in `migrations/`.
//! - [`memory::MemoryListingStore`]: an in-process `Vec`, used for local
//!   runs without a database and in tests.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::ListingQuery;
use crate::error::ListingsError;

pub use memory::MemoryListingStore;
pub use models::{
    BedroomStats, FilterChoices, ListingPage, ListingPhoto, ListingRow, PropertyManagement,
};
pub use postgres::PostgresListingStore;

/// Read access to the listings collection.
///
/// Only rows with no `unlisted_at` are "currently listed"; the lookup
/// methods below consider those rows only. [`ListingStore::search`]
/// receives that restriction as an explicit predicate.
#[async_trait]
pub trait ListingStore: Send + Sync + Debug {
    /// Returns the rows inside `query.window` together with the exact
    /// number of rows matching `query.predicates`, in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] when the store fails.
    async fn search(&self, query: &ListingQuery) -> Result<ListingPage, ListingsError>;

    /// Distinct non-null cities, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] when the store fails.
    async fn distinct_cities(&self) -> Result<Vec<String>, ListingsError>;

    /// Distinct non-null bedroom counts, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] when the store fails.
    async fn distinct_bedrooms(&self) -> Result<Vec<i32>, ListingsError>;

    /// Distinct non-null bathroom counts, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] when the store fails.
    async fn distinct_bathrooms(&self) -> Result<Vec<i32>, ListingsError>;

    /// Average and median market rent per bedroom count, ascending by
    /// bedroom count.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] when the store fails.
    async fn bedroom_stats(&self) -> Result<Vec<BedroomStats>, ListingsError>;

    /// All property managements, sorted by display name.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] when the store fails.
    async fn property_managements(&self) -> Result<Vec<PropertyManagement>, ListingsError>;
}
