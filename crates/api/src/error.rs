use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use vicinity_core::error::CoreError;

/// Error type every handler returns.
///
/// Domain failures arrive as [`CoreError`] through `#[from]`; the remaining
/// variants cover conditions that only exist at the HTTP layer. Rendering
/// happens in one place so every failure hits the wire as the same JSON
/// envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed or out-of-range request input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing resource addressed by a string key (slug, section, scope).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The client asked for an onboarding step it has not reached. Carries
    /// the page it should visit instead.
    #[error("Step not available yet")]
    StepLocked { redirect_to: String },

    /// A dependency this deployment does not have, like voice transcription
    /// without a configured provider.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Shorthand for handler signatures.
pub type AppResult<T> = Result<T, AppError>;

/// The envelope every error response serializes to.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    /// Only present on step-order violations: the page to go to instead.
    #[serde(rename = "redirectTo", skip_serializing_if = "Option::is_none")]
    redirect_to: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let redirect_to = match &self {
            AppError::StepLocked { redirect_to } => Some(redirect_to.clone()),
            _ => None,
        };
        let (status, code, message) = self.http_parts();

        let body = ErrorBody {
            error: message,
            code,
            redirect_to,
        };
        (status, axum::Json(body)).into_response()
    }
}

impl AppError {
    fn http_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => db_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::StepLocked { .. } => (
                StatusCode::CONFLICT,
                "STEP_LOCKED",
                "This step is not available yet".to_string(),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Map database failures onto the API surface. `RowNotFound` is a plain 404;
/// a unique violation on a `uq_`-named constraint is the caller's conflict;
/// everything else gets logged and hidden behind a generic 500.
fn db_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // 23505 is PostgreSQL's unique_violation.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
