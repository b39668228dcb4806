//! Best-effort draft persistence.
//!
//! Drafts are autosaves, not records. Losing one is an annoyance; failing
//! a request over one is a bug. Every write and delete here logs failures
//! at WARN and then swallows them, and every load is forgiving: absent,
//! unreadable, corrupt, or wrong-place snapshots all come back as `None`.

use serde_json::Value;
use vicinity_core::draft::{snapshot_is_well_formed, snapshot_matches_place, DraftScope};
use vicinity_core::DbId;
use vicinity_db::repositories::DraftRepo;
use vicinity_db::DbPool;

/// Save a snapshot for a scope, swallowing failures.
pub async fn save_draft(pool: &DbPool, user_id: DbId, scope: DraftScope, snapshot: &Value) {
    if let Err(err) = DraftRepo::upsert(pool, user_id, scope.as_str(), snapshot).await {
        tracing::warn!(user_id, scope = scope.as_str(), error = %err, "Failed to save draft");
    }
}

/// Load the snapshot for a scope, if a usable one exists.
///
/// `place_id` only matters for review drafts: a snapshot saved for a
/// different place is treated as no draft.
pub async fn load_draft(
    pool: &DbPool,
    user_id: DbId,
    scope: DraftScope,
    place_id: Option<&str>,
) -> Option<Value> {
    let row = match DraftRepo::find(pool, user_id, scope.as_str()).await {
        Ok(row) => row?,
        Err(err) => {
            tracing::warn!(user_id, scope = scope.as_str(), error = %err, "Failed to load draft");
            return None;
        }
    };
    if !snapshot_is_well_formed(&row.snapshot) {
        tracing::warn!(
            user_id,
            scope = scope.as_str(),
            "Discarding malformed draft snapshot"
        );
        return None;
    }
    if !snapshot_matches_place(scope, &row.snapshot, place_id) {
        return None;
    }
    Some(row.snapshot)
}

/// Delete the draft for a scope, swallowing failures.
pub async fn clear_draft(pool: &DbPool, user_id: DbId, scope: DraftScope) {
    if let Err(err) = DraftRepo::delete(pool, user_id, scope.as_str()).await {
        tracing::warn!(user_id, scope = scope.as_str(), error = %err, "Failed to clear draft");
    }
}

/// Delete all onboarding drafts, swallowing failures. Called once the
/// answers are committed to the profile and the drafts are stale.
pub async fn clear_onboarding_drafts(pool: &DbPool, user_id: DbId) {
    let keys: Vec<&str> = DraftScope::onboarding_scopes()
        .iter()
        .map(|s| s.as_str())
        .collect();
    if let Err(err) = DraftRepo::delete_scopes(pool, user_id, &keys).await {
        tracing::warn!(user_id, error = %err, "Failed to clear onboarding drafts");
    }
}
