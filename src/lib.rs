//! # rental-listings
//!
//! Search and pagination service for rental listings.
//!
//! A search arrives as an untyped query string. It is normalized into a
//! fully defaulted [`domain::ListingFilterSpec`], turned into declarative
//! predicate records, executed by a [`persistence::ListingStore`] in one
//! round trip, and answered with the page, its pagination metadata and
//! round-trippable links for every pager button and active filter.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ListingService (service/)
//!     │
//!     ├── Normalizer · Query builder · Pagination · Reconstructor (domain/)
//!     │
//!     └── ListingStore (persistence/)
//!             ├── PostgreSQL
//!             └── in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
