//! Service layer: business logic orchestration.
//!
//! [`ListingService`] turns raw request parameters into store queries and
//! assembles search results, filter choices and statistics.

pub mod listing_service;

pub use listing_service::{ListingService, SearchOutcome};
