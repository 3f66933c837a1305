//! Visitor preference handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::api::dto::ThemePreferenceDto;
use crate::api::extract::ThemePreference;
use crate::app_state::AppState;
use crate::domain::THEME_COOKIE;
use crate::error::{ErrorResponse, ListingsError};

/// `GET /preferences/theme` — Read the theme cookie.
#[utoipa::path(
    get,
    path = "/api/v1/preferences/theme",
    tag = "Preferences",
    summary = "Current theme",
    description = "Returns the theme stored in the `hcr-theme` cookie, or `system` when none is set.",
    responses(
        (status = 200, description = "Current theme", body = ThemePreferenceDto),
    )
)]
pub async fn get_theme(ThemePreference(theme): ThemePreference) -> Json<ThemePreferenceDto> {
    Json(ThemePreferenceDto { theme })
}

/// `PUT /preferences/theme` — Store the theme cookie.
///
/// # Errors
///
/// Returns [`ListingsError::InvalidRequest`] when the body does not name a
/// known theme.
#[utoipa::path(
    put,
    path = "/api/v1/preferences/theme",
    tag = "Preferences",
    summary = "Set theme",
    description = "Stores the theme in the long-lived `hcr-theme` cookie.",
    request_body = ThemePreferenceDto,
    responses(
        (status = 200, description = "Theme stored", body = ThemePreferenceDto),
        (status = 400, description = "Unknown theme", body = ErrorResponse),
    )
)]
pub async fn put_theme(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<ThemePreferenceDto>, JsonRejection>,
) -> Result<(CookieJar, Json<ThemePreferenceDto>), ListingsError> {
    let Json(pref) = payload?;
    let cookie = Cookie::build((THEME_COOKIE, pref.theme.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .permanent();
    tracing::debug!(theme = %pref.theme, "theme preference stored");
    Ok((jar.add(cookie), Json(pref)))
}

/// Preference routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/preferences/theme", get(get_theme).put(put_theme))
}
