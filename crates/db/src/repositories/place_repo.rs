//! Repository for the `places` table and the discover feed queries.

use sqlx::PgPool;
use vicinity_core::discover::{Section, Sort, PAGE_SIZE};
use vicinity_core::types::DbId;

use crate::models::place::{Place, PlaceQuery, PlaceSearchRow};

/// Column list for full `places` rows.
const COLUMNS: &str = "\
    id, slug, name, category, description, image_url, price_tier, \
    latitude, longitude, open_now, is_featured, rating_sum, review_count, \
    created_at, updated_at";

/// Subquery computing the discover projection: the mean rating from the
/// denormalized aggregates, the haversine distance to the caller's origin
/// ($1, $2; NULL when either side lacks coordinates), and whether the
/// category matches one of the caller's interests ($3).
///
/// The sqrt argument is clamped below 1.0 so float error cannot push
/// `asin` out of domain.
const PROJECTED_PLACES: &str = "\
    SELECT id, slug, name, category, description, image_url, price_tier, \
           open_now, is_featured, review_count, created_at, \
           CASE WHEN review_count > 0 \
                THEN rating_sum::DOUBLE PRECISION / review_count \
                ELSE 0 END AS avg_rating, \
           CASE WHEN $1::DOUBLE PRECISION IS NULL OR $2::DOUBLE PRECISION IS NULL \
                     OR latitude IS NULL OR longitude IS NULL \
                THEN NULL \
                ELSE 6371.0 * 2 * asin(least(1.0, sqrt( \
                     power(sin(radians(latitude - $1) / 2), 2) + \
                     cos(radians($1)) * cos(radians(latitude)) * \
                     power(sin(radians(longitude - $2) / 2), 2)))) \
           END AS distance_km, \
           (category = ANY($3)) AS interest_match \
    FROM places";

/// Filter clause over the projection. Each condition collapses to TRUE
/// when its parameter is bound NULL.
const PLACE_FILTERS: &str = "\
    ($4::TEXT IS NULL OR category = $4) \
    AND ($5::TEXT IS NULL OR price_tier = $5) \
    AND ($6::DOUBLE PRECISION IS NULL OR avg_rating >= $6) \
    AND ($7::DOUBLE PRECISION IS NULL \
         OR (distance_km IS NOT NULL AND distance_km <= $7)) \
    AND ($8::BOOLEAN IS NULL OR open_now = $8) \
    AND ($9::BOOLEAN IS NULL OR is_featured = $9)";

/// Provides place lookups and the discover search.
pub struct PlaceRepo;

impl PlaceRepo {
    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find a place by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE slug = $1");
        sqlx::query_as::<_, Place>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a place by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = $1");
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a batch of places by ID. Order is unspecified.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = ANY($1)");
        sqlx::query_as::<_, Place>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Discover search
    // -----------------------------------------------------------------------

    /// Fetch one page of discover results for a section.
    ///
    /// Sections are rankings over the same corpus; only `featured`
    /// restricts the row set. An explicit sort overrides the section's
    /// native ranking.
    pub async fn search(
        pool: &PgPool,
        params: &PlaceQuery,
    ) -> Result<Vec<PlaceSearchRow>, sqlx::Error> {
        let order_by = order_clause(params.section, params.sort);
        let query = format!(
            "SELECT id, slug, name, category, description, image_url, price_tier, \
                    open_now, is_featured, review_count, avg_rating, distance_km \
             FROM ({PROJECTED_PLACES}) p \
             WHERE {PLACE_FILTERS} \
             ORDER BY {order_by} \
             LIMIT $10 OFFSET $11"
        );

        let limit = PAGE_SIZE as i64;
        let offset = (params.page - 1).max(0) * limit;

        bind_search_params(sqlx::query_as::<_, PlaceSearchRow>(&query), params)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all rows matching a discover query, ignoring pagination.
    pub async fn search_count(pool: &PgPool, params: &PlaceQuery) -> Result<i64, sqlx::Error> {
        let query =
            format!("SELECT COUNT(*) FROM ({PROJECTED_PLACES}) p WHERE {PLACE_FILTERS}");

        let count: (i64,) = bind_search_params(sqlx::query_as(&query), params)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

/// Bind $1 through $9 in the order the search SQL expects.
fn bind_search_params<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    params: &'q PlaceQuery,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    let (lat, lng) = match params.origin {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    };
    let featured_only = (params.section == Section::Featured).then_some(true);
    let open_now = params.filters.open_now.then_some(true);

    query
        .bind(lat)
        .bind(lng)
        .bind(&params.interests)
        .bind(params.filters.category.as_deref())
        .bind(params.filters.price.map(|p| p.as_str()))
        .bind(params.filters.min_rating)
        .bind(params.filters.max_distance_km)
        .bind(open_now)
        .bind(featured_only)
}

/// ORDER BY expression for a section and sort combination.
fn order_clause(section: Section, sort: Sort) -> &'static str {
    match sort {
        Sort::Rating => "avg_rating DESC, review_count DESC, id",
        Sort::Distance => "distance_km ASC NULLS LAST, avg_rating DESC, id",
        Sort::Newest => "created_at DESC, id",
        Sort::Relevance => match section {
            Section::ForYou => "interest_match DESC, avg_rating DESC, review_count DESC, id",
            Section::Trending => "review_count DESC, avg_rating DESC, id",
            Section::Nearby => "distance_km ASC NULLS LAST, avg_rating DESC, id",
            Section::Featured => "avg_rating DESC, review_count DESC, id",
        },
    }
}
