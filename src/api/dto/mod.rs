//! Data Transfer Objects for REST request/response serialization.

pub mod filter_dto;
pub mod listing_dto;

pub use filter_dto::*;
pub use listing_dto::*;
