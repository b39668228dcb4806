//! Review authoring and listing handlers.
//!
//! Clients identify places by slug. Validation is field-scoped: the first
//! failing rule names its field in the 400 message so the composer can
//! surface it inline.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use vicinity_core::discover::{has_more, PAGE_SIZE};
use vicinity_core::draft::DraftScope;
use vicinity_core::review::{validate_review, PhotoAttachment};
use vicinity_db::models::place::Place;
use vicinity_db::models::review::{CreateReview, ReviewWithPhotos};
use vicinity_db::repositories::{PlaceRepo, ReviewRepo};

use crate::drafts::clear_draft;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub place_id: String,
    /// Missing reads as zero, which validation rejects with the
    /// select-a-rating prompt rather than a decode error.
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub photos: Vec<PhotoAttachment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    pub place_id: String,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// POST /api/reviews
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let place = find_place(&state, &input.place_id).await?;
    let validated = validate_review(
        input.rating,
        &input.tags,
        &input.text,
        &input.transcription,
        &input.photos,
    )?;

    let created = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            place_id: place.id,
            user_id: auth.user_id,
            rating: validated.rating,
            tags: validated.tags,
            body: validated.body,
            text_content: validated.text,
            transcription: validated.transcription,
            photos: input
                .photos
                .into_iter()
                .map(|p| (p.name, p.data_url))
                .collect(),
        },
    )
    .await?;

    // The composer's autosave is stale once the review exists.
    clear_draft(&state.pool, auth.user_id, DraftScope::Review).await;

    tracing::info!(
        user_id = auth.user_id,
        place_id = place.id,
        review_id = created.review.id,
        "Review created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: review_json(&created, &place.slug),
        }),
    ))
}

/// GET /api/reviews?placeId={slug}&page={n} -- newest first.
pub async fn list_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Json<DataResponse<Value>>> {
    let place = find_place(&state, &query.place_id).await?;

    let page = query.page.max(1);
    let limit = PAGE_SIZE as i64;
    let offset = (page - 1) * limit;

    let reviews = ReviewRepo::list_for_place(&state.pool, place.id, limit, offset).await?;
    let total_count = ReviewRepo::count_for_place(&state.pool, place.id).await?;

    let results: Vec<Value> = reviews.iter().map(|r| review_json(r, &place.slug)).collect();
    Ok(Json(DataResponse {
        data: json!({
            "results": results,
            "totalCount": total_count,
            "page": page,
            "hasMore": has_more(results.len()),
        }),
    }))
}

/// Resolve a place slug or answer 404.
async fn find_place(state: &AppState, slug: &str) -> AppResult<Place> {
    PlaceRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place '{slug}' not found")))
}

/// Serialize a review the way clients consume it.
fn review_json(review: &ReviewWithPhotos, place_slug: &str) -> Value {
    let photos: Vec<Value> = review
        .photos
        .iter()
        .map(|p| json!({ "name": p.file_name, "dataUrl": p.data_url }))
        .collect();
    json!({
        "id": review.review.id,
        "placeId": place_slug,
        "rating": review.review.rating,
        "tags": review.review.tags,
        "body": review.review.body,
        "text": review.review.text_content,
        "transcription": review.review.transcription,
        "photos": photos,
        "createdAt": review.review.created_at,
    })
}
