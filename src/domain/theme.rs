//! Site-wide colour theme preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cookie holding the visitor's theme preference.
pub const THEME_COOKIE: &str = "hcr-theme";

/// Colour theme a visitor can pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the operating system setting.
    #[default]
    System,
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Cookie value for this theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Reads a stored cookie value; anything missing or unknown is
    /// [`Theme::System`].
    #[must_use]
    pub fn from_cookie(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A theme name outside `system | light | dark`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_unknown_cookie_is_system() {
        assert_eq!(Theme::from_cookie(None), Theme::System);
        assert_eq!(Theme::from_cookie(Some("sepia")), Theme::System);
        assert_eq!(Theme::from_cookie(Some("")), Theme::System);
    }

    #[test]
    fn known_values_parse() {
        assert_eq!(Theme::from_cookie(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_cookie(Some("light")), Theme::Light);
        assert_eq!("system".parse::<Theme>(), Ok(Theme::System));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).ok(), Some("\"dark\"".to_string()));
    }
}
