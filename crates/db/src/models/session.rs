//! Refresh-token session model and DTO.

use sqlx::FromRow;
use vicinity_core::types::{DbId, Timestamp};

/// A session row from the `user_sessions` table. Holds the hash of the
/// opaque refresh token, never the token itself.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    /// Mirrors the refresh token lifetime. Rows past this point are dead
    /// weight the periodic cleanup sweep deletes.
    pub expires_at: Timestamp,
    /// Set by logout. A revoked row refuses refresh even before expiry.
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields the caller supplies when opening a session.
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
