//! Request-scoped extractors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::domain::{THEME_COOKIE, Theme};

/// Theme preference read from the request's `hcr-theme` cookie.
///
/// Never rejects: a missing or unknown cookie yields [`Theme::System`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemePreference(pub Theme);

impl<S> FromRequestParts<S> for ThemePreference
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let theme = Theme::from_cookie(jar.get(THEME_COOKIE).map(|cookie| cookie.value()));
        Ok(Self(theme))
    }
}
