//! Declarative listings query built from a [`ListingFilterSpec`].
//!
//! The builder produces plain `{field, operator, value}` records; each
//! [`ListingStore`](crate::persistence::ListingStore) translates them into
//! its own query language. Building is a pure function of the filter spec.

use chrono::{DateTime, Utc};

use super::filter_spec::{ListingFilterSpec, SortOption};
use super::pagination::PaginationWindow;

/// Listing column a predicate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `market_rent`
    MarketRent,
    /// `deposit`
    Deposit,
    /// `square_feet`
    SquareFeet,
    /// `bedrooms`
    Bedrooms,
    /// `bathrooms`
    Bathrooms,
    /// `dogs`
    Dogs,
    /// `cats`
    Cats,
    /// `address_city`
    AddressCity,
    /// `available_date`
    AvailableDate,
    /// `unlisted_at`
    UnlistedAt,
}

impl Field {
    /// Column name in the `listings` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::MarketRent => "market_rent",
            Self::Deposit => "deposit",
            Self::SquareFeet => "square_feet",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::Dogs => "dogs",
            Self::Cats => "cats",
            Self::AddressCity => "address_city",
            Self::AvailableDate => "available_date",
            Self::UnlistedAt => "unlisted_at",
        }
    }
}

impl From<SortOption> for Field {
    fn from(sort: SortOption) -> Self {
        match sort {
            SortOption::MarketRent => Self::MarketRent,
            SortOption::Bedrooms => Self::Bedrooms,
            SortOption::Bathrooms => Self::Bathrooms,
        }
    }
}

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `field = value`
    Eq,
    /// `field >= value`
    Gte,
    /// `field <= value`
    Lte,
    /// `field` is one of the listed values.
    In,
    /// `field IS NULL`; the value is ignored.
    IsNull,
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    /// A numeric bound.
    Number(f64),
    /// A list of integer members.
    Integers(Vec<i64>),
    /// A list of text members.
    Texts(Vec<String>),
    /// A boolean.
    Flag(bool),
    /// A timestamp.
    Instant(DateTime<Utc>),
    /// No value (used with [`Operator::IsNull`]).
    Null,
}

/// One `{field, operator, value}` filter record.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column being tested.
    pub field: Field,
    /// Comparison.
    pub operator: Operator,
    /// Comparison operand.
    pub value: PredicateValue,
}

impl Predicate {
    /// Creates a predicate record.
    #[must_use]
    pub const fn new(field: Field, operator: Operator, value: PredicateValue) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }
}

/// Ordering of the result set. There is no tiebreaker column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    /// Column to order by.
    pub field: Field,
    /// Ascending when `true`.
    pub ascending: bool,
}

/// Everything a store needs to fetch one page and the exact total count.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    /// Filters, all of which must hold.
    pub predicates: Vec<Predicate>,
    /// Result ordering.
    pub ordering: Ordering,
    /// Inclusive row slice to return.
    pub window: PaginationWindow,
}

impl ListingQuery {
    /// Builds the query for `spec`.
    ///
    /// Minimum bounds and the "not unlisted" filter are always present
    /// (a 0 minimum is a no-op for non-null columns). Every other predicate
    /// appears only when its filter is set.
    #[must_use]
    pub fn build(spec: &ListingFilterSpec) -> Self {
        use Operator::{Eq, Gte, In, IsNull, Lte};
        use PredicateValue::{Flag, Instant, Null, Number};

        let mut predicates = vec![
            Predicate::new(Field::MarketRent, Gte, Number(spec.rent_min)),
            Predicate::new(Field::Deposit, Gte, Number(spec.deposit_min)),
            Predicate::new(Field::SquareFeet, Gte, Number(spec.sq_ft_min)),
            Predicate::new(Field::UnlistedAt, IsNull, Null),
        ];

        if spec.rent_max > 0.0 {
            predicates.push(Predicate::new(Field::MarketRent, Lte, Number(spec.rent_max)));
        }
        if spec.deposit_max > 0.0 {
            predicates.push(Predicate::new(Field::Deposit, Lte, Number(spec.deposit_max)));
        }
        if spec.sq_ft_max > 0.0 {
            predicates.push(Predicate::new(Field::SquareFeet, Lte, Number(spec.sq_ft_max)));
        }
        if let Some(bedrooms) = &spec.bedrooms {
            let members = bedrooms.iter().map(|&n| i64::from(n)).collect();
            predicates.push(Predicate::new(
                Field::Bedrooms,
                In,
                PredicateValue::Integers(members),
            ));
        }
        if let Some(bathrooms) = &spec.bathrooms {
            let members = bathrooms.iter().map(|&n| i64::from(n)).collect();
            predicates.push(Predicate::new(
                Field::Bathrooms,
                In,
                PredicateValue::Integers(members),
            ));
        }
        if spec.dogs_required {
            predicates.push(Predicate::new(Field::Dogs, Eq, Flag(true)));
        }
        if spec.cats_required {
            predicates.push(Predicate::new(Field::Cats, Eq, Flag(true)));
        }
        if let Some(cities) = &spec.cities {
            let members = cities.iter().cloned().collect();
            predicates.push(Predicate::new(
                Field::AddressCity,
                In,
                PredicateValue::Texts(members),
            ));
        }
        if let Some(from) = spec.available_from {
            predicates.push(Predicate::new(Field::AvailableDate, Gte, Instant(from)));
        }
        if let Some(to) = spec.available_to {
            predicates.push(Predicate::new(Field::AvailableDate, Lte, Instant(to)));
        }

        Self {
            predicates,
            ordering: Ordering {
                field: spec.sort.into(),
                ascending: spec.ascending,
            },
            window: spec.window(),
        }
    }
}
