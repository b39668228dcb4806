//! Profile handler: account info, onboarding answers, review history.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use vicinity_core::error::CoreError;
use vicinity_core::onboarding::dealbreaker_label;
use vicinity_core::DbId;
use vicinity_db::models::review::ReviewWithPhotos;
use vicinity_db::models::user::UserResponse;
use vicinity_db::repositories::{PlaceRepo, ProfileRepo, ReviewRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Value>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    let profile = ProfileRepo::get_or_create(&state.pool, auth.user_id).await?;

    let reviews = ReviewRepo::list_for_user(&state.pool, auth.user_id).await?;
    let review_count = ReviewRepo::count_for_user(&state.pool, auth.user_id).await?;
    let places = place_lookup(&state, &reviews).await?;

    let dealbreakers: Vec<Value> = profile
        .dealbreakers
        .iter()
        .map(|id| json!({ "id": id, "label": dealbreaker_label(id) }))
        .collect();
    let review_json: Vec<Value> = reviews.iter().map(|r| profile_review(r, &places)).collect();

    Ok(Json(DataResponse {
        data: json!({
            "user": UserResponse::from(&user),
            "onboarding": {
                "complete": profile.onboarding_complete,
                "step": profile.current_step().as_str(),
                "interests": profile.interests,
                "subInterests": profile.sub_interests,
                "dealbreakers": dealbreakers,
            },
            "reviewCount": review_count,
            "reviews": review_json,
        }),
    }))
}

/// Slug and name for every place the user has reviewed.
async fn place_lookup(
    state: &AppState,
    reviews: &[ReviewWithPhotos],
) -> AppResult<BTreeMap<DbId, (String, String)>> {
    let mut ids: Vec<DbId> = reviews.iter().map(|r| r.review.place_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let places = PlaceRepo::find_by_ids(&state.pool, &ids).await?;
    Ok(places
        .into_iter()
        .map(|p| (p.id, (p.slug, p.name)))
        .collect())
}

fn profile_review(review: &ReviewWithPhotos, places: &BTreeMap<DbId, (String, String)>) -> Value {
    let (slug, name) = places
        .get(&review.review.place_id)
        .map(|(s, n)| (s.as_str(), n.as_str()))
        .unwrap_or(("", ""));
    let photos: Vec<Value> = review
        .photos
        .iter()
        .map(|p| json!({ "name": p.file_name, "dataUrl": p.data_url }))
        .collect();
    json!({
        "id": review.review.id,
        "placeId": slug,
        "placeName": name,
        "rating": review.review.rating,
        "tags": review.review.tags,
        "body": review.review.body,
        "photos": photos,
        "createdAt": review.review.created_at,
    })
}
