//! Filter form and preference DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{FilterUpdate, Theme};

/// Request body of `POST /api/v1/listings/query-string`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QueryStringRequest {
    /// Current query string, with or without the leading `?`.
    #[serde(default)]
    pub query: String,
    /// Updates applied in order.
    #[serde(default)]
    pub updates: Vec<FilterUpdate>,
}

/// Response of `POST /api/v1/listings/query-string`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueryStringResponse {
    /// Resulting query string (no leading `?`).
    pub query: String,
}

/// Theme preference as read from or written to the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ThemePreferenceDto {
    /// Selected theme.
    pub theme: Theme,
}
