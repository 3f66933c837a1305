//! Liberal coercion of raw query-string values.
//!
//! Every function here is total: bad input degrades to a default or to
//! "absent", never to an error.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use super::query_params::LIST_DELIMITER;

/// Sentinel some clients send for a cleared set filter.
pub const NULL_SENTINEL: &str = "null";

/// Converts a raw value to a finite number, or `default` if that fails.
///
/// Whitespace is ignored and an empty string counts as missing.
///
/// ```
/// use rental_listings::domain::coerce::to_number;
///
/// assert_eq!(to_number(Some("42"), 0.0), 42.0);
/// assert_eq!(to_number(Some("abc"), 5.0), 5.0);
/// assert_eq!(to_number(None, -1.0), -1.0);
/// ```
#[must_use]
pub fn to_number(raw: Option<&str>, default: f64) -> f64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(default)
}

/// Parses a non-negative bound where 0 means "not set".
#[must_use]
pub fn to_bound(raw: Option<&str>) -> f64 {
    let n = to_number(raw, 0.0);
    if n > 0.0 { n } else { 0.0 }
}

/// Rounds a raw value to a positive integer, falling back to `default`
/// when the rounded value is below 1.
#[must_use]
pub fn to_positive_int(raw: Option<&str>, default: u32) -> u32 {
    let n = to_number(raw, f64::from(default)).round();
    if n < 1.0 {
        default
    } else if n >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = n as u32;
        n
    }
}

/// `true` only for the exact string `"true"`.
#[must_use]
pub fn to_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// Parses an RFC 3339 instant or a plain `YYYY-MM-DD` date (midnight UTC).
#[must_use]
pub fn to_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Splits comma-joined and repeated values into individual pieces.
///
/// Pieces are trimmed; empty pieces and the `"null"` sentinel are dropped.
fn split_pieces<'a>(values: &[&'a str]) -> impl Iterator<Item = &'a str> {
    values
        .iter()
        .flat_map(|v| v.split(LIST_DELIMITER))
        .map(str::trim)
        .filter(|piece| !piece.is_empty() && *piece != NULL_SENTINEL)
}

/// Collects a set of strings; `None` when nothing survives.
#[must_use]
pub fn to_text_set(values: &[&str]) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = split_pieces(values).map(str::to_string).collect();
    (!set.is_empty()).then_some(set)
}

/// Collects a set of non-negative integers; `None` when nothing survives.
///
/// Pieces that are not whole non-negative numbers are dropped.
#[must_use]
pub fn to_integer_set(values: &[&str]) -> Option<BTreeSet<u32>> {
    let set: BTreeSet<u32> = split_pieces(values)
        .filter_map(|piece| {
            let n = to_number(Some(piece), -1.0);
            if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
                return None;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let n = n as u32;
            Some(n)
        })
        .collect();
    (!set.is_empty()).then_some(set)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_liberal() {
        assert_eq!(to_number(Some("abc"), 5.0), 5.0);
        assert_eq!(to_number(Some("42"), 0.0), 42.0);
        assert_eq!(to_number(None, -1.0), -1.0);
        assert_eq!(to_number(Some(" 7.5 "), 0.0), 7.5);
        assert_eq!(to_number(Some(""), 3.0), 3.0);
        assert_eq!(to_number(Some("NaN"), 3.0), 3.0);
        assert_eq!(to_number(Some("inf"), 3.0), 3.0);
    }

    #[test]
    fn negative_bounds_are_unset() {
        assert_eq!(to_bound(Some("-100")), 0.0);
        assert_eq!(to_bound(Some("1500")), 1500.0);
        assert_eq!(to_bound(Some("lots")), 0.0);
    }

    #[test]
    fn positive_ints_round_and_default() {
        assert_eq!(to_positive_int(Some("2.6"), 1), 3);
        assert_eq!(to_positive_int(Some("0"), 1), 1);
        assert_eq!(to_positive_int(Some("0.4"), 10), 10);
        assert_eq!(to_positive_int(Some("-3"), 10), 10);
        assert_eq!(to_positive_int(None, 10), 10);
        assert_eq!(to_positive_int(Some("1e12"), 1), u32::MAX);
    }

    #[test]
    fn flags_require_exact_true() {
        assert!(to_flag(Some("true")));
        assert!(!to_flag(Some("TRUE")));
        assert!(!to_flag(Some("1")));
        assert!(!to_flag(None));
    }

    #[test]
    fn instants_accept_dates_and_rfc3339() {
        let Some(date) = to_instant(Some("2024-05-01")) else {
            panic!("plain date should parse");
        };
        assert_eq!(date.to_rfc3339(), "2024-05-01T00:00:00+00:00");

        let Some(instant) = to_instant(Some("2024-05-01T10:30:00-07:00")) else {
            panic!("rfc3339 should parse");
        };
        assert_eq!(instant.to_rfc3339(), "2024-05-01T17:30:00+00:00");

        assert!(to_instant(Some("next tuesday")).is_none());
        assert!(to_instant(Some("")).is_none());
        assert!(to_instant(None).is_none());
    }

    #[test]
    fn integer_sets_split_and_flatten() {
        let Some(set) = to_integer_set(&["2,3", "5"]) else {
            panic!("expected a set");
        };
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![2, 3, 5]);
    }

    #[test]
    fn null_sentinel_and_empty_mean_absent() {
        assert!(to_integer_set(&["null"]).is_none());
        assert!(to_integer_set(&[""]).is_none());
        assert!(to_integer_set(&[]).is_none());
        assert!(to_text_set(&["null"]).is_none());
        assert!(to_text_set(&[",,"]).is_none());
    }

    #[test]
    fn invalid_integer_pieces_are_dropped() {
        let Some(set) = to_integer_set(&["2,abc,-1,1.5,4"]) else {
            panic!("expected a set");
        };
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![2, 4]);
        assert!(to_integer_set(&["abc"]).is_none());
    }

    #[test]
    fn text_sets_keep_spaces_inside_names() {
        let Some(set) = to_text_set(&["Arcata,Fields Landing"]) else {
            panic!("expected a set");
        };
        assert!(set.contains("Fields Landing"));
        assert_eq!(set.len(), 2);
    }
}
