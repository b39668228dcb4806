//! Domain error vocabulary.
//!
//! Repositories and validation helpers return [`CoreError`]; the API layer
//! owns the mapping to HTTP statuses and never lets `Internal` detail
//! reach a client.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An id-addressed row that should exist does not.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// User input rejected by a domain rule. The message is written for
    /// the person who typed the input, not for a log file.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request lost a race or repeats something already done, like
    /// finishing onboarding before the earlier steps.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No usable session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A session exists but this account may not do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Broken invariants and infrastructure failures. Rendered generically
    /// at the edge.
    #[error("Internal error: {0}")]
    Internal(String),
}
