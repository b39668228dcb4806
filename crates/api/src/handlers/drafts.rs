//! Draft autosave endpoints.
//!
//! Thin wrappers over [`crate::drafts`]: the scope key in the path is the
//! only thing validated hard. Saves and deletes always report success;
//! loads answer `{ "data": null }` whenever no usable snapshot exists.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use vicinity_core::draft::DraftScope;

use crate::drafts::{clear_draft, load_draft, save_draft};
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::response::{DataResponse, FlowResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    #[serde(default)]
    pub snapshot: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftQuery {
    pub place_id: Option<String>,
}

/// PUT /api/drafts/{scope}
pub async fn save(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Json(input): Json<SaveDraftRequest>,
) -> AppResult<Json<FlowResponse>> {
    let scope = DraftScope::from_str_db(&scope)?;
    save_draft(&state.pool, auth.user_id, scope, &input.snapshot).await;
    Ok(Json(FlowResponse::ok()))
}

/// GET /api/drafts/{scope}
///
/// `placeId` narrows review drafts to one place; a snapshot saved for a
/// different place reads as no draft.
pub async fn load(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(query): Query<DraftQuery>,
) -> AppResult<Json<DataResponse<Option<Value>>>> {
    let scope = DraftScope::from_str_db(&scope)?;
    let snapshot = load_draft(&state.pool, auth.user_id, scope, query.place_id.as_deref()).await;
    Ok(Json(DataResponse { data: snapshot }))
}

/// DELETE /api/drafts/{scope}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scope): Path<String>,
) -> AppResult<Json<FlowResponse>> {
    let scope = DraftScope::from_str_db(&scope)?;
    clear_draft(&state.pool, auth.user_id, scope).await;
    Ok(Json(FlowResponse::ok()))
}
