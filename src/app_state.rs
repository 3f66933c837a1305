//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::ListingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Listing service for all search and catalog logic.
    pub listing_service: Arc<ListingService>,
    /// Whether preference cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}
