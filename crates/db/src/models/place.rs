//! Place entity model and discover query types.

use sqlx::FromRow;
use vicinity_core::discover::{Filters, Section, Sort};
use vicinity_core::types::{Coordinates, DbId, Timestamp};

/// Full place row from the `places` table.
#[derive(Debug, Clone, FromRow)]
pub struct Place {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_tier: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub open_now: bool,
    pub is_featured: bool,
    pub rating_sum: i64,
    pub review_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Place {
    /// Mean rating over the denormalized aggregates, 0.0 when unreviewed.
    pub fn average_rating(&self) -> f64 {
        if self.review_count > 0 {
            self.rating_sum as f64 / self.review_count as f64
        } else {
            0.0
        }
    }
}

/// Parameters for one discover page query.
#[derive(Debug, Clone)]
pub struct PlaceQuery {
    pub section: Section,
    pub filters: Filters,
    pub sort: Sort,
    /// Origin for distance computation.
    pub origin: Option<Coordinates>,
    /// The requesting user's interests; ranks the for-you section.
    pub interests: Vec<String>,
    /// 1-based page number.
    pub page: i64,
}

/// One discover result row: place columns plus the computed mean rating
/// and, when an origin was supplied, the haversine distance to it.
#[derive(Debug, Clone, FromRow)]
pub struct PlaceSearchRow {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_tier: String,
    pub open_now: bool,
    pub is_featured: bool,
    pub review_count: i64,
    pub avg_rating: f64,
    pub distance_km: Option<f64>,
}
