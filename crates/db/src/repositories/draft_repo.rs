//! Repository for the `user_drafts` table.
//!
//! Plain upsert/fetch/delete. The API layer decides when draft failures
//! are swallowed; nothing here is policy.

use sqlx::PgPool;
use vicinity_core::types::DbId;

use crate::models::draft::UserDraft;

/// Column list for `user_drafts` queries.
const COLUMNS: &str = "id, user_id, scope_key, snapshot, created_at, updated_at";

/// Provides draft snapshot storage, one row per (user, scope).
pub struct DraftRepo;

impl DraftRepo {
    /// Insert or replace the draft for a scope. Most recent write wins.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        scope_key: &str,
        snapshot: &serde_json::Value,
    ) -> Result<UserDraft, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_drafts (user_id, scope_key, snapshot) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, scope_key) \
             DO UPDATE SET snapshot = EXCLUDED.snapshot, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserDraft>(&query)
            .bind(user_id)
            .bind(scope_key)
            .bind(snapshot)
            .fetch_one(pool)
            .await
    }

    /// Fetch the draft for a scope, if any.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        scope_key: &str,
    ) -> Result<Option<UserDraft>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_drafts WHERE user_id = $1 AND scope_key = $2");
        sqlx::query_as::<_, UserDraft>(&query)
            .bind(user_id)
            .bind(scope_key)
            .fetch_optional(pool)
            .await
    }

    /// Delete the draft for a scope. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        scope_key: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_drafts WHERE user_id = $1 AND scope_key = $2")
            .bind(user_id)
            .bind(scope_key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every draft in the given scopes. Returns the count deleted.
    pub async fn delete_scopes(
        pool: &PgPool,
        user_id: DbId,
        scope_keys: &[&str],
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_drafts WHERE user_id = $1 AND scope_key = ANY($2)")
                .bind(user_id)
                .bind(scope_keys)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
