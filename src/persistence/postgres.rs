//! PostgreSQL implementation of [`ListingStore`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::ListingStore;
use super::models::{
    BedroomStats, ListingPage, ListingPhoto, ListingRow, PropertyManagement,
};
use crate::config::ListingsConfig;
use crate::domain::{ListingQuery, Operator, Predicate, PredicateValue};
use crate::error::ListingsError;

/// Columns selected into the `matched` CTE. Property management columns are
/// prefixed with `pm_` so the page can be read back as one flat record.
const MATCHED_COLUMNS: &str = "l.listable_uid, l.full_address, l.address_address1, \
     l.address_address2, l.address_city, l.marketing_title, l.default_photo_thumbnail_url, \
     l.market_rent, l.deposit, l.square_feet, l.bedrooms, l.bathrooms, l.dogs, l.cats, \
     l.available_date, l.unlisted_at, l.photos, \
     pm.id AS pm_id, pm.display_name AS pm_display_name, \
     pm.listing_item_url AS pm_listing_item_url, pm.logo_url AS pm_logo_url, \
     pm.accent_color AS pm_accent_color, \
     pm.accent_color_foreground AS pm_accent_color_foreground";

/// PostgreSQL-backed listings store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresListingStore {
    pool: PgPool,
}

impl PostgresListingStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] if the database cannot be
    /// reached within the configured timeout.
    pub async fn connect(config: &ListingsConfig) -> Result<Self, ListingsError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the migrations in `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingsError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ListingsError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ListingsError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl ListingStore for PostgresListingStore {
    async fn search(&self, query: &ListingQuery) -> Result<ListingPage, ListingsError> {
        let mut qb = build_search(query);
        let records = qb
            .build_query_as::<SearchRecord>()
            .fetch_all(&self.pool)
            .await?;

        // COUNT(*) always yields one row; an empty page comes back as that
        // row with every page column null.
        let total_count = records
            .first()
            .map_or(0, |r| u64::try_from(r.total_count).unwrap_or(0));
        let rows = records
            .into_iter()
            .filter_map(SearchRecord::into_row)
            .collect();

        Ok(ListingPage { rows, total_count })
    }

    async fn distinct_cities(&self) -> Result<Vec<String>, ListingsError> {
        let cities = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT address_city FROM listings \
             WHERE unlisted_at IS NULL AND address_city IS NOT NULL \
             ORDER BY address_city",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cities)
    }

    async fn distinct_bedrooms(&self) -> Result<Vec<i32>, ListingsError> {
        let bedrooms = sqlx::query_scalar::<_, i32>(
            "SELECT DISTINCT bedrooms FROM listings \
             WHERE unlisted_at IS NULL AND bedrooms IS NOT NULL \
             ORDER BY bedrooms",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(bedrooms)
    }

    async fn distinct_bathrooms(&self) -> Result<Vec<i32>, ListingsError> {
        let bathrooms = sqlx::query_scalar::<_, i32>(
            "SELECT DISTINCT bathrooms FROM listings \
             WHERE unlisted_at IS NULL AND bathrooms IS NOT NULL \
             ORDER BY bathrooms",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(bathrooms)
    }

    async fn bedroom_stats(&self) -> Result<Vec<BedroomStats>, ListingsError> {
        let stats = sqlx::query_as::<_, BedroomStats>(
            "SELECT bedrooms, \
                    AVG(market_rent) AS avg_market_rent, \
                    PERCENTILE_CONT(0.5) WITHIN GROUP (ORDER BY market_rent) AS median_market_rent, \
                    COUNT(*) AS count \
             FROM listings \
             WHERE unlisted_at IS NULL AND bedrooms >= 0 AND market_rent IS NOT NULL \
             GROUP BY bedrooms \
             ORDER BY bedrooms",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn property_managements(&self) -> Result<Vec<PropertyManagement>, ListingsError> {
        let managements = sqlx::query_as::<_, PropertyManagement>(
            "SELECT id, display_name, listing_item_url, logo_url, accent_color, \
                    accent_color_foreground \
             FROM property_managements \
             ORDER BY display_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(managements)
    }
}

/// Builds the single-round-trip search statement.
///
/// ```sql
/// WITH matched AS (SELECT … WHERE <predicates>)
/// SELECT counted.total_count, page.*
/// FROM (SELECT COUNT(*) AS total_count FROM matched) counted
/// LEFT JOIN LATERAL (
///     SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY …) AS page_position FROM matched) ranked
///     ORDER BY page_position LIMIT … OFFSET …
/// ) page ON TRUE
/// ORDER BY page.page_position
/// ```
///
/// The sort runs once; the page is emitted in the order it was sliced.
fn build_search(query: &ListingQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("WITH matched AS (SELECT ");
    qb.push(MATCHED_COLUMNS);
    qb.push(
        " FROM listings l \
         JOIN property_managements pm ON pm.id = l.property_management_id \
         WHERE TRUE",
    );
    for predicate in &query.predicates {
        push_predicate(&mut qb, predicate);
    }

    let column = query.ordering.field.column();
    let direction = if query.ordering.ascending { "ASC" } else { "DESC" };
    let limit = i64::try_from(query.window.row_count()).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.window.start).unwrap_or(i64::MAX);

    qb.push(
        ") SELECT counted.total_count, page.* \
         FROM (SELECT COUNT(*) AS total_count FROM matched) counted \
         LEFT JOIN LATERAL (SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY ",
    );
    qb.push(column).push(" ").push(direction);
    qb.push(") AS page_position FROM matched) ranked ORDER BY page_position");
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);
    qb.push(") page ON TRUE ORDER BY page.page_position");
    qb
}

fn push_predicate(qb: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    let column = predicate.field.column();
    qb.push(" AND l.").push(column);

    let comparison = match predicate.operator {
        Operator::IsNull => {
            qb.push(" IS NULL");
            return;
        }
        Operator::In => {
            qb.push(" = ANY(");
            match &predicate.value {
                PredicateValue::Integers(members) => qb.push_bind(members.clone()),
                PredicateValue::Texts(members) => qb.push_bind(members.clone()),
                _ => qb.push_bind(Vec::<String>::new()),
            };
            qb.push(")");
            return;
        }
        Operator::Eq => " = ",
        Operator::Gte => " >= ",
        Operator::Lte => " <= ",
    };

    qb.push(comparison);
    match &predicate.value {
        PredicateValue::Number(n) => qb.push_bind(*n),
        PredicateValue::Flag(b) => qb.push_bind(*b),
        PredicateValue::Instant(at) => qb.push_bind(*at),
        PredicateValue::Integers(members) => qb.push_bind(members.first().copied()),
        PredicateValue::Texts(members) => qb.push_bind(members.first().cloned()),
        PredicateValue::Null => qb.push("NULL"),
    };
}

/// One row of the search statement: the total count plus a nullable page row.
#[derive(Debug, FromRow)]
struct SearchRecord {
    total_count: i64,
    listable_uid: Option<String>,
    full_address: Option<String>,
    address_address1: Option<String>,
    address_address2: Option<String>,
    address_city: Option<String>,
    marketing_title: Option<String>,
    default_photo_thumbnail_url: Option<String>,
    market_rent: Option<f64>,
    deposit: Option<f64>,
    square_feet: Option<f64>,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    dogs: Option<bool>,
    cats: Option<bool>,
    available_date: Option<DateTime<Utc>>,
    unlisted_at: Option<DateTime<Utc>>,
    photos: Option<Json<Vec<ListingPhoto>>>,
    pm_id: Option<i64>,
    pm_display_name: Option<String>,
    pm_listing_item_url: Option<String>,
    pm_logo_url: Option<String>,
    pm_accent_color: Option<String>,
    pm_accent_color_foreground: Option<String>,
}

impl SearchRecord {
    fn into_row(self) -> Option<ListingRow> {
        let listable_uid = self.listable_uid?;
        let property_management = PropertyManagement {
            id: self.pm_id?,
            display_name: self.pm_display_name.unwrap_or_default(),
            listing_item_url: self.pm_listing_item_url,
            logo_url: self.pm_logo_url,
            accent_color: self.pm_accent_color,
            accent_color_foreground: self.pm_accent_color_foreground,
        };
        Some(ListingRow {
            listable_uid,
            full_address: self.full_address,
            address_address1: self.address_address1,
            address_address2: self.address_address2,
            address_city: self.address_city,
            marketing_title: self.marketing_title,
            default_photo_thumbnail_url: self.default_photo_thumbnail_url,
            market_rent: self.market_rent,
            deposit: self.deposit,
            square_feet: self.square_feet,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            dogs: self.dogs,
            cats: self.cats,
            available_date: self.available_date,
            unlisted_at: self.unlisted_at,
            photos: self.photos.map(|Json(photos)| photos).unwrap_or_default(),
            property_management,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingFilterSpec, QueryParams};

    fn sql_for(query: &str) -> String {
        let spec = ListingFilterSpec::normalize(&QueryParams::parse(query));
        build_search(&ListingQuery::build(&spec)).sql().to_string()
    }

    #[test]
    fn default_search_binds_minimums_and_window() {
        let sql = sql_for("");
        assert!(sql.starts_with("WITH matched AS (SELECT l.listable_uid"));
        assert!(sql.contains("l.market_rent >= $1"));
        assert!(sql.contains("l.deposit >= $2"));
        assert!(sql.contains("l.square_feet >= $3"));
        assert!(sql.contains("l.unlisted_at IS NULL"));
        assert!(sql.contains("ROW_NUMBER() OVER (ORDER BY market_rent DESC) AS page_position"));
        assert!(sql.contains("ORDER BY page_position LIMIT $4 OFFSET $5"));
        assert!(sql.ends_with("ORDER BY page.page_position"));
    }

    #[test]
    fn listing_column_is_sorted_once() {
        let sql = sql_for("sort=bathrooms&asc=true");
        assert_eq!(sql.matches("ORDER BY bathrooms ASC").count(), 1);
        assert!(!sql.contains("page.bathrooms"));
    }

    #[test]
    fn set_filters_use_any_arrays() {
        let sql = sql_for("bedrooms=1,2&cities=Arcata&cats=true&sort=bedrooms&asc=true");
        assert!(sql.contains("l.bedrooms = ANY($"));
        assert!(sql.contains("l.address_city = ANY($"));
        assert!(sql.contains("l.cats = $"));
        assert!(sql.contains("ORDER BY bedrooms ASC"));
    }

    #[test]
    fn unset_maximums_are_not_in_the_statement() {
        let sql = sql_for("rentMax=0");
        assert!(!sql.contains("<="));
    }

    #[test]
    fn empty_page_record_is_skipped() {
        let record = SearchRecord {
            total_count: 0,
            listable_uid: None,
            full_address: None,
            address_address1: None,
            address_address2: None,
            address_city: None,
            marketing_title: None,
            default_photo_thumbnail_url: None,
            market_rent: None,
            deposit: None,
            square_feet: None,
            bedrooms: None,
            bathrooms: None,
            dogs: None,
            cats: None,
            available_date: None,
            unlisted_at: None,
            photos: None,
            pm_id: None,
            pm_display_name: None,
            pm_listing_item_url: None,
            pm_logo_url: None,
            pm_accent_color: None,
            pm_accent_color_foreground: None,
        };
        assert!(record.into_row().is_none());
    }
}
