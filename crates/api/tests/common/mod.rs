//! Shared helpers for the HTTP integration tests.
//!
//! `build_test_app` assembles the production router (same middleware
//! stack as `main.rs`) over a test database pool, and the request
//! helpers drive it through `tower::ServiceExt::oneshot`. Sessions are
//! cookie-borne, so helpers that act as a logged-in user take the
//! `Cookie` header value returned by [`session_cookies`].

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vicinity_api::auth::jwt::JwtConfig;
use vicinity_api::config::ServerConfig;
use vicinity_api::router::build_app_router;
use vicinity_api::state::AppState;
use vicinity_api::transcribe::Transcriber;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cookie_secure: false,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. No transcription provider is wired in; tests for
/// the transcribe endpoint use [`build_app_with`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, None)
}

/// Build the application router with an explicit transcription provider.
pub fn build_app_with(pool: PgPool, transcriber: Option<Arc<dyn Transcriber>>) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        transcriber,
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_cookies(app: Router, path: &str, cookies: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_with_cookies(
    app: Router,
    path: &str,
    body: serde_json::Value,
    cookies: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookies)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_with_cookies(
    app: Router,
    path: &str,
    body: serde_json::Value,
    cookies: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookies)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_with_cookies(app: Router, path: &str, cookies: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collapse every `Set-Cookie` header in a response into a `Cookie`
/// request header value for follow-up requests.
pub fn session_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Password used by every account the test helpers create.
pub const TEST_PASSWORD: &str = "a-strong-password";

/// Register a fresh account through the API and return the session cookie
/// header for follow-up requests.
pub async fn create_account(pool: &PgPool, email: &str) -> String {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "email": email,
        "password": TEST_PASSWORD,
        "name": "Test User",
    });
    let response = post_json(app, "/api/auth/create-account", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookies(&response)
}

/// Walk an account through the whole onboarding flow so it can reach the
/// main app surfaces (discover, reviews, profile).
///
/// Leaves the profile with interests `Food & Dining`, `Arts & Culture`,
/// and `Music`.
pub async fn pass_onboarding(pool: &PgPool, cookies: &str) {
    let steps = [
        (
            "/api/onboarding/interests",
            serde_json::json!({ "interests": ["Food & Dining", "Arts & Culture", "Music"] }),
        ),
        (
            "/api/onboarding/sub-interests",
            serde_json::json!({ "subInterests": {
                "food-drink": ["coffee", "street-food"],
                "arts-culture": ["museums"],
            } }),
        ),
        (
            "/api/onboarding/dealbreakers",
            serde_json::json!({ "dealbreakers": ["trust", "pricing"] }),
        ),
        ("/api/onboarding/complete", serde_json::json!({})),
    ];

    for (path, body) in steps {
        let app = build_test_app(pool.clone());
        let response = post_json_with_cookies(app, path, body, cookies).await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "onboarding step {path} should succeed"
        );
    }
}
