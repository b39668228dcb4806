//! One router construction path for the binary and the integration tests.
//!
//! `main.rs` and `tests/common/mod.rs` both call [`build_app_router`], so a
//! request in a test passes through the identical middleware stack it would
//! hit in production.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Request body ceiling. Review photos travel inline as base64 data URLs,
/// so this sits well above the 5 MB per-photo limit.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Assemble the routes and the middleware around them.
///
/// Reading the `.layer` calls from the last to the first gives the order a
/// request traverses them: panic recovery wraps everything, then the
/// timeout, then request-id stamping and tracing, then the body limit and
/// CORS closest to the handlers. Health and the onboarding step pages sit
/// at the root; everything else lives under `/api`.
pub fn build_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let request_id = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::page_routes())
        .nest("/api", routes::api_routes())
        // Turns handler panics into 500s instead of dropped connections.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.request_timeout_secs),
        ))
        // Stamp x-request-id on the way in, echo it on the way out, and
        // trace in between.
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        // Inline photo uploads outgrow axum's default 2 MB limit.
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

// Cookies only flow cross-origin with allow_credentials, which in turn
// rules out a wildcard origin; the origin list must be explicit. A
// malformed entry panics here at startup rather than shipping a server
// that quietly rejects every browser.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
