//! Ordered query-string multi-map and the override-based reconstructor.
//!
//! [`QueryParams`] is the single mutable representation every query source
//! is normalized into, whether it arrives as a raw query string or as a
//! plain key/value map. [`reconstruct`] applies a sparse set of
//! [`Overrides`] to a copy of it and serializes the result back to a
//! URL-encoded string (no leading `?`).

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use url::form_urlencoded;

use super::filter_spec::SortOption;

/// Separator used for set-valued parameters (`bedrooms=2,3`).
pub const LIST_DELIMITER: char = ',';

/// Ordered multi-map of query-string parameters.
///
/// Preserves insertion order and repeated keys, mirroring the semantics of
/// a browser `URLSearchParams`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL-encoded query string. A single leading `?` is ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Builds a parameter set from key/value pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value stored under `key`, in order.
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replaces all values of `key` with a single `value`.
    ///
    /// The new value takes the position of the first existing occurrence;
    /// if the key is new it is appended.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                if let Some(slot) = self.pairs.get_mut(idx) {
                    slot.1 = value;
                }
                let mut i = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = k != key || i == idx;
                    i += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Removes every value stored under `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Number of key/value pairs, counting repeated keys separately.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over the key/value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes to a URL-encoded query string without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

/// Sparse set of changes to apply on top of a [`QueryParams`].
///
/// `None` removes the key; `Some` replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: Vec<(String, Option<String>)>,
}

impl Overrides {
    /// Creates an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `key` with the string form of `value`.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl QueryValue) -> Self {
        self.entries.push((key.to_string(), Some(value.to_query_value())));
        self
    }

    /// Removes `key` entirely.
    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        self.entries.push((key.to_string(), None));
        self
    }

    /// Sets `key` when `value` is `Some`, removes it otherwise.
    #[must_use]
    pub fn set_or_remove<V: QueryValue>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self.remove(key),
        }
    }

    /// Iterates over the overrides in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// Applies `overrides` to a copy of `base` and returns the encoded result.
#[must_use]
pub fn reconstruct(base: &QueryParams, overrides: &Overrides) -> String {
    let mut params = base.clone();
    for (key, value) in overrides.iter() {
        match value {
            Some(value) => params.set(key, value),
            None => params.remove(key),
        }
    }
    params.to_query_string()
}

/// Conversion of a typed override into its query-string form.
///
/// Collections are comma-joined so the normalizer can split them back.
pub trait QueryValue {
    /// Returns the unencoded string written into the query string.
    fn to_query_value(&self) -> String;
}

impl QueryValue for str {
    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> String {
        self.clone()
    }
}

impl QueryValue for bool {
    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for u32 {
    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for u64 {
    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryValue for f64 {
    fn to_query_value(&self) -> String {
        format_number(*self)
    }
}

impl QueryValue for DateTime<Utc> {
    fn to_query_value(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl QueryValue for SortOption {
    fn to_query_value(&self) -> String {
        self.as_str().to_string()
    }
}

impl QueryValue for BTreeSet<u32> {
    fn to_query_value(&self) -> String {
        join_list(self.iter().map(ToString::to_string))
    }
}

impl QueryValue for BTreeSet<String> {
    fn to_query_value(&self) -> String {
        join_list(self.iter().cloned())
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> String {
        (*self).to_query_value()
    }
}

fn join_list(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(&LIST_DELIMITER.to_string())
}

/// Formats a number the way a browser would: whole values have no
/// fractional part.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = value as i64;
        whole.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_repeated_keys_in_order() {
        let params = QueryParams::parse("?bedrooms=2&city=Arcata&bedrooms=3");
        assert_eq!(params.all("bedrooms"), vec!["2", "3"]);
        assert_eq!(params.first("city"), Some("Arcata"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn parse_decodes_percent_and_plus() {
        let params = QueryParams::parse("cities=Mc+Kinleyville%2CEureka");
        assert_eq!(params.first("cities"), Some("Mc Kinleyville,Eureka"));
    }

    #[test]
    fn removing_override_drops_key_and_keeps_others() {
        let base = QueryParams::parse("?rentMin=500&city=Arcata");
        let out = reconstruct(&base, &Overrides::new().remove("rentMin"));
        assert_eq!(out, "city=Arcata");
    }

    #[test]
    fn set_replaces_instead_of_appending() {
        let base = QueryParams::parse("pageNumber=1&sort=bedrooms&pageNumber=4");
        let out = reconstruct(&base, &Overrides::new().set("pageNumber", 2u32));
        assert_eq!(out, "pageNumber=2&sort=bedrooms");
    }

    #[test]
    fn new_keys_are_appended() {
        let base = QueryParams::from_pairs([("sort", "bedrooms")]);
        let out = reconstruct(&base, &Overrides::new().set("asc", true));
        assert_eq!(out, "sort=bedrooms&asc=true");
    }

    #[test]
    fn removing_missing_key_is_noop() {
        let base = QueryParams::parse("a=1");
        let out = reconstruct(&base, &Overrides::new().remove("b"));
        assert_eq!(out, "a=1");
    }

    #[test]
    fn set_values_are_comma_joined_and_encoded() {
        let cities: BTreeSet<String> = ["Eureka".to_string(), "Arcata".to_string()].into();
        let out = reconstruct(&QueryParams::new(), &Overrides::new().set("cities", &cities));
        assert_eq!(out, "cities=Arcata%2CEureka");
    }

    #[test]
    fn whole_numbers_have_no_fraction() {
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(1250.5), "1250.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn base_is_not_mutated() {
        let base = QueryParams::parse("a=1&b=2");
        let _ = reconstruct(&base, &Overrides::new().remove("a"));
        assert_eq!(base.first("a"), Some("1"));
    }
}
