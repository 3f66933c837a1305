//! In-memory implementation of [`ListingStore`].
//!
//! Evaluates predicate records with SQL `NULL` semantics: a comparison
//! against a missing value is false, so a `>= 0` bound excludes rows whose
//! column is null. Ordering follows PostgreSQL defaults (nulls last when
//! ascending, first when descending).

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ListingStore;
use super::models::{BedroomStats, ListingPage, ListingRow, PropertyManagement};
use crate::domain::{Field, ListingQuery, Operator, Ordering, Predicate, PredicateValue};
use crate::error::ListingsError;

/// Listings held in process memory. Read-only after construction.
#[derive(Debug, Default)]
pub struct MemoryListingStore {
    rows: RwLock<Vec<ListingRow>>,
}

impl MemoryListingStore {
    /// Creates a store holding `rows`.
    #[must_use]
    pub fn new(rows: Vec<ListingRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Loads rows from a JSON array of listings.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] if the file cannot be
    /// read or is not a JSON array of listings.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, ListingsError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ListingsError::PersistenceError(format!("cannot read {}: {e}", path.display()))
        })?;
        let rows: Vec<ListingRow> = serde_json::from_str(&raw).map_err(|e| {
            ListingsError::PersistenceError(format!("invalid seed file {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), rows = rows.len(), "loaded seed listings");
        Ok(Self::new(rows))
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn search(&self, query: &ListingQuery) -> Result<ListingPage, ListingsError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<&ListingRow> = rows
            .iter()
            .filter(|row| query.predicates.iter().all(|p| matches(row, p)))
            .collect();
        matched.sort_by(|a, b| compare(a, b, query.ordering));

        let total_count = matched.len() as u64;
        let skip = usize::try_from(query.window.start).unwrap_or(usize::MAX);
        let take = usize::try_from(query.window.row_count()).unwrap_or(usize::MAX);
        let rows = matched.into_iter().skip(skip).take(take).cloned().collect();

        Ok(ListingPage { rows, total_count })
    }

    async fn distinct_cities(&self) -> Result<Vec<String>, ListingsError> {
        let rows = self.rows.read().await;
        let mut cities: Vec<String> = listed(&rows)
            .filter_map(|row| row.address_city.clone())
            .collect();
        cities.sort();
        cities.dedup();
        Ok(cities)
    }

    async fn distinct_bedrooms(&self) -> Result<Vec<i32>, ListingsError> {
        let rows = self.rows.read().await;
        let mut bedrooms: Vec<i32> = listed(&rows).filter_map(|row| row.bedrooms).collect();
        bedrooms.sort_unstable();
        bedrooms.dedup();
        Ok(bedrooms)
    }

    async fn distinct_bathrooms(&self) -> Result<Vec<i32>, ListingsError> {
        let rows = self.rows.read().await;
        let mut bathrooms: Vec<i32> = listed(&rows).filter_map(|row| row.bathrooms).collect();
        bathrooms.sort_unstable();
        bathrooms.dedup();
        Ok(bathrooms)
    }

    async fn bedroom_stats(&self) -> Result<Vec<BedroomStats>, ListingsError> {
        let rows = self.rows.read().await;
        let mut rents: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for row in listed(&rows) {
            if let (Some(bedrooms), Some(rent)) = (row.bedrooms, row.market_rent) {
                if bedrooms >= 0 {
                    rents.entry(bedrooms).or_default().push(rent);
                }
            }
        }

        Ok(rents
            .into_iter()
            .map(|(bedrooms, mut values)| {
                values.sort_by(f64::total_cmp);
                let count = values.len();
                let sum: f64 = values.iter().sum();
                BedroomStats {
                    bedrooms,
                    avg_market_rent: Some(sum / count as f64),
                    median_market_rent: median(&values),
                    count: i64::try_from(count).unwrap_or(i64::MAX),
                }
            })
            .collect())
    }

    async fn property_managements(&self) -> Result<Vec<PropertyManagement>, ListingsError> {
        let rows = self.rows.read().await;
        let mut managements: Vec<PropertyManagement> = Vec::new();
        for row in rows.iter() {
            if !managements.iter().any(|m| m.id == row.property_management.id) {
                managements.push(row.property_management.clone());
            }
        }
        managements.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(managements)
    }
}

fn listed(rows: &[ListingRow]) -> impl Iterator<Item = &ListingRow> {
    rows.iter().filter(|row| row.unlisted_at.is_none())
}

/// Continuous median, as `PERCENTILE_CONT(0.5)`. `sorted` must be ascending.
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let upper = sorted.get(n / 2).copied()?;
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower = sorted.get(n / 2 - 1).copied()?;
    Some((lower + upper) / 2.0)
}

/// A column value lifted out of a row for comparison.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Text(String),
    Flag(bool),
    Instant(DateTime<Utc>),
}

fn cell(row: &ListingRow, field: Field) -> Option<Cell> {
    match field {
        Field::MarketRent => row.market_rent.map(Cell::Number),
        Field::Deposit => row.deposit.map(Cell::Number),
        Field::SquareFeet => row.square_feet.map(Cell::Number),
        Field::Bedrooms => row.bedrooms.map(|n| Cell::Number(f64::from(n))),
        Field::Bathrooms => row.bathrooms.map(|n| Cell::Number(f64::from(n))),
        Field::Dogs => row.dogs.map(Cell::Flag),
        Field::Cats => row.cats.map(Cell::Flag),
        Field::AddressCity => row.address_city.clone().map(Cell::Text),
        Field::AvailableDate => row.available_date.map(Cell::Instant),
        Field::UnlistedAt => row.unlisted_at.map(Cell::Instant),
    }
}

fn compare_cells(left: &Cell, right: &Cell) -> Option<CmpOrdering> {
    match (left, right) {
        (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(b),
        (Cell::Text(a), Cell::Text(b)) => Some(a.cmp(b)),
        (Cell::Flag(a), Cell::Flag(b)) => Some(a.cmp(b)),
        (Cell::Instant(a), Cell::Instant(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn operand(value: &PredicateValue) -> Option<Cell> {
    match value {
        PredicateValue::Number(n) => Some(Cell::Number(*n)),
        PredicateValue::Flag(b) => Some(Cell::Flag(*b)),
        PredicateValue::Instant(at) => Some(Cell::Instant(*at)),
        PredicateValue::Integers(_) | PredicateValue::Texts(_) | PredicateValue::Null => None,
    }
}

fn matches(row: &ListingRow, predicate: &Predicate) -> bool {
    let value = cell(row, predicate.field);
    if predicate.operator == Operator::IsNull {
        return value.is_none();
    }
    let Some(value) = value else {
        return false;
    };

    match predicate.operator {
        Operator::In => match &predicate.value {
            PredicateValue::Integers(members) => members
                .iter()
                .any(|&m| value == Cell::Number(m as f64)),
            PredicateValue::Texts(members) => {
                members.iter().any(|m| value == Cell::Text(m.clone()))
            }
            _ => false,
        },
        op => {
            let Some(ordering) = operand(&predicate.value)
                .and_then(|operand| compare_cells(&value, &operand))
            else {
                return false;
            };
            match op {
                Operator::Eq => ordering == CmpOrdering::Equal,
                Operator::Gte => ordering != CmpOrdering::Less,
                Operator::Lte => ordering != CmpOrdering::Greater,
                Operator::In | Operator::IsNull => false,
            }
        }
    }
}

fn compare(a: &ListingRow, b: &ListingRow, ordering: Ordering) -> CmpOrdering {
    let by_value = match (cell(a, ordering.field), cell(b, ordering.field)) {
        (Some(x), Some(y)) => compare_cells(&x, &y).unwrap_or(CmpOrdering::Equal),
        (None, None) => CmpOrdering::Equal,
        // Nulls sort as larger than any value.
        (None, Some(_)) => CmpOrdering::Greater,
        (Some(_), None) => CmpOrdering::Less,
    };
    if ordering.ascending {
        by_value
    } else {
        by_value.reverse()
    }
}
