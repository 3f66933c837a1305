//! Removable "filter chips" for the active filters of a search.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::filter_spec::{ListingFilterSpec, keys};
use super::query_params::{Overrides, QueryValue, format_number, reconstruct};

/// One active filter and the query string that removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterChip {
    /// Query-string key the chip belongs to.
    pub key: String,
    /// Human-readable label, e.g. `Min rent $1,500`.
    pub label: String,
    /// Canonical query string with this filter removed (no leading `?`).
    pub remove_query: String,
}

/// Builds the chips for every active filter in `spec`.
///
/// Set filters yield one chip per member; removing the last member removes
/// the key entirely.
#[must_use]
pub fn filter_chips(spec: &ListingFilterSpec) -> Vec<FilterChip> {
    let base = spec.to_query_params();
    let chip = |key: &str, label: String, overrides: Overrides| FilterChip {
        key: key.to_string(),
        label,
        remove_query: reconstruct(&base, &overrides),
    };
    let remove = |key: &str| Overrides::new().remove(key);

    let mut chips = Vec::new();
    let money = [
        (keys::RENT_MIN, "Min rent $", spec.rent_min),
        (keys::RENT_MAX, "Max rent $", spec.rent_max),
        (keys::DEPOSIT_MIN, "Min deposit $", spec.deposit_min),
        (keys::DEPOSIT_MAX, "Max deposit $", spec.deposit_max),
        (keys::SQ_FT_MIN, "Min square ft ", spec.sq_ft_min),
        (keys::SQ_FT_MAX, "Max square ft ", spec.sq_ft_max),
    ];
    for (key, prefix, value) in money {
        if value > 0.0 {
            chips.push(chip(key, format!("{prefix}{}", group_thousands(value)), remove(key)));
        }
    }

    if let Some(bedrooms) = &spec.bedrooms {
        for n in bedrooms {
            chips.push(chip(
                keys::BEDROOMS,
                format!("{n} bed"),
                without_member(keys::BEDROOMS, bedrooms, n),
            ));
        }
    }
    if let Some(bathrooms) = &spec.bathrooms {
        for n in bathrooms {
            chips.push(chip(
                keys::BATHROOMS,
                format!("{n} bath"),
                without_member(keys::BATHROOMS, bathrooms, n),
            ));
        }
    }
    if let Some(from) = spec.available_from {
        chips.push(chip(
            keys::AVAILABLE_FROM,
            format!("Available since {}", short_date(from)),
            remove(keys::AVAILABLE_FROM),
        ));
    }
    if let Some(to) = spec.available_to {
        chips.push(chip(
            keys::AVAILABLE_TO,
            format!("Available up to {}", short_date(to)),
            remove(keys::AVAILABLE_TO),
        ));
    }
    if spec.cats_required {
        chips.push(chip(keys::CATS, "Cats required".to_string(), remove(keys::CATS)));
    }
    if spec.dogs_required {
        chips.push(chip(keys::DOGS, "Dogs required".to_string(), remove(keys::DOGS)));
    }
    if let Some(cities) = &spec.cities {
        for city in cities {
            chips.push(chip(
                keys::CITIES,
                city.clone(),
                without_member(keys::CITIES, cities, city),
            ));
        }
    }
    chips
}

fn without_member<T>(key: &str, set: &BTreeSet<T>, member: &T) -> Overrides
where
    T: Ord + Clone,
    BTreeSet<T>: QueryValue,
{
    let rest: BTreeSet<T> = set.iter().filter(|m| *m != member).cloned().collect();
    if rest.is_empty() {
        Overrides::new().remove(key)
    } else {
        Overrides::new().set(key, rest)
    }
}

fn short_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Formats a number with `,` thousands separators (`1500` → `1,500`).
#[must_use]
pub fn group_thousands(value: f64) -> String {
    let text = format_number(value);
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
