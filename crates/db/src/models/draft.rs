//! Server-held draft model.

use sqlx::FromRow;
use vicinity_core::types::{DbId, Timestamp};

/// A draft row from the `user_drafts` table: one JSON snapshot per
/// (user, scope). `updated_at` is the save time reported to clients.
#[derive(Debug, Clone, FromRow)]
pub struct UserDraft {
    pub id: DbId,
    pub user_id: DbId,
    pub scope_key: String,
    pub snapshot: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
