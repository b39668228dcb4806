//! Discover feed handlers.
//!
//! One endpoint serves all four sections; the section is a ranking, the
//! query string supplies filters, sort, and the caller's coordinates.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use vicinity_core::discover::{
    has_more, validate_max_distance, validate_min_rating, Filters, PriceTier, Section, Sort,
};
use vicinity_db::models::place::{PlaceQuery, PlaceSearchRow};
use vicinity_db::repositories::{PlaceRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverQuery {
    pub category: Option<String>,
    pub price: Option<String>,
    pub min_rating: Option<f64>,
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub open_now: bool,
    pub sort: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// GET /api/discover/{section}
pub async fn discover_section(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(section): Path<String>,
    Query(query): Query<DiscoverQuery>,
) -> AppResult<Json<DataResponse<Value>>> {
    // The section is part of the URL space, so an unknown one is a missing
    // resource rather than a bad parameter.
    let section = Section::from_str_db(&section)
        .map_err(|_| AppError::NotFound(format!("Unknown discover section '{section}'")))?;

    let filters = build_filters(&query)?;
    let sort = match &query.sort {
        Some(s) => Sort::from_str_db(s)?,
        None => Sort::default(),
    };

    let origin = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "Both lat and lng are required for location-based results".to_string(),
            ))
        }
    };
    if filters.max_distance_km.is_some() && origin.is_none() {
        return Err(AppError::BadRequest(
            "Distance filtering requires lat and lng".to_string(),
        ));
    }

    // The for-you ranking boosts places matching the caller's interests.
    let interests = if section == Section::ForYou {
        ProfileRepo::get_or_create(&state.pool, auth.user_id)
            .await?
            .interests
    } else {
        Vec::new()
    };

    let params = PlaceQuery {
        section,
        filters,
        sort,
        origin,
        interests,
        page: query.page.max(1),
    };

    let rows = PlaceRepo::search(&state.pool, &params).await?;
    let total_count = PlaceRepo::search_count(&state.pool, &params).await?;
    let results: Vec<Value> = rows.iter().map(place_json).collect();

    tracing::debug!(
        user_id = auth.user_id,
        section = section.as_str(),
        count = results.len(),
        "Discover page served"
    );

    Ok(Json(DataResponse {
        data: json!({
            "section": {
                "id": section.as_str(),
                "title": section.title(),
                "subtitle": section.subtitle(),
            },
            "results": results,
            "totalCount": total_count,
            "page": params.page,
            "hasMore": has_more(results.len()),
        }),
    }))
}

fn build_filters(query: &DiscoverQuery) -> AppResult<Filters> {
    let price = match &query.price {
        Some(p) => Some(PriceTier::from_str_db(p)?),
        None => None,
    };
    if let Some(rating) = query.min_rating {
        validate_min_rating(rating)?;
    }
    if let Some(km) = query.max_distance_km {
        validate_max_distance(km)?;
    }
    Ok(Filters {
        category: query.category.clone(),
        price,
        min_rating: query.min_rating,
        max_distance_km: query.max_distance_km,
        open_now: query.open_now,
    })
}

/// Serialize one discover result. Places are identified by slug on the
/// wire; the numeric id stays internal.
fn place_json(row: &PlaceSearchRow) -> Value {
    let price_display = PriceTier::from_str_db(&row.price_tier)
        .ok()
        .map(|p| p.display());
    json!({
        "id": row.slug,
        "name": row.name,
        "category": row.category,
        "description": row.description,
        "imageUrl": row.image_url,
        "price": row.price_tier,
        "priceDisplay": price_display,
        "openNow": row.open_now,
        "featured": row.is_featured,
        "rating": row.avg_rating,
        "reviewCount": row.review_count,
        "distanceKm": row.distance_km,
    })
}
