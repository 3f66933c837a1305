//! Domain layer: listings search logic.
//!
//! Everything in here is synchronous and free of I/O. A request's raw query
//! string flows through [`QueryParams`] → [`ListingFilterSpec`] →
//! [`ListingQuery`]; the store's total count then feeds [`PageSummary`],
//! and [`reconstruct`] turns specs back into links.

pub mod coerce;
pub mod filter_chip;
pub mod filter_spec;
pub mod filter_update;
pub mod pagination;
pub mod query_params;
pub mod query_spec;
pub mod theme;

pub use filter_chip::{FilterChip, filter_chips};
pub use filter_spec::{DEFAULT_PAGE_SIZE, ListingFilterSpec, MAX_PAGE_SIZE, SortOption, keys};
pub use filter_update::FilterUpdate;
pub use pagination::{PageLinks, PageSummary, PaginationWindow};
pub use query_params::{Overrides, QueryParams, QueryValue, reconstruct};
pub use query_spec::{Field, ListingQuery, Operator, Ordering, Predicate, PredicateValue};
pub use theme::{THEME_COOKIE, Theme};
