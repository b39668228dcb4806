use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What `GET /health` reports.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every probe passes, `"degraded"` otherwise.
    pub status: &'static str,
    /// Version baked in from Cargo.toml.
    pub version: &'static str,
    /// Result of the database round-trip probe.
    pub db_healthy: bool,
}

impl HealthResponse {
    fn report(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// Liveness probe. Answers even when the database is down, with
/// `status: "degraded"`, so load balancers can tell a sick instance
/// from a dead one.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = vicinity_db::health_check(&state.pool).await.is_ok();
    Json(HealthResponse::report(db_healthy))
}

/// `/health` stays at the root, outside the `/api` tree, so probes skip
/// the API middleware.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
