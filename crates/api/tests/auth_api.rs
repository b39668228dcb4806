//! HTTP-level integration tests for the auth endpoints.
//!
//! Tests cover account creation, cookie-borne login, token refresh with
//! rotation, logout, and account lockout.

mod common;

use axum::http::StatusCode;
use axum::response::Response;
use common::{
    body_json, create_account, get, get_with_cookies, pass_onboarding, post_json,
    post_json_with_cookies, session_cookies, TEST_PASSWORD,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The full `Set-Cookie` header for a named cookie, or panic.
fn find_set_cookie(response: &Response, name: &str) -> String {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{name}=")))
        .unwrap_or_else(|| panic!("Missing Set-Cookie for {name}"))
        .to_string()
}

/// Log in via the API and return the response.
async fn login(pool: &PgPool, email: &str, password: &str) -> Response {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": email, "password": password });
    post_json(app, "/api/auth/login", body).await
}

// ---------------------------------------------------------------------------
// Account creation
// ---------------------------------------------------------------------------

/// Creating an account sets the session cookie pair and points the client
/// at the first onboarding step.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_account_sets_session_and_redirects(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "new@example.com",
        "password": TEST_PASSWORD,
        "name": "New User",
    });
    let response = post_json(app, "/api/auth/create-account", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let access = find_set_cookie(&response, "access_token");
    assert!(access.contains("HttpOnly"), "access cookie must be httpOnly");
    assert!(access.contains("SameSite=Lax"));
    assert!(access.contains("Path=/"));
    let refresh = find_set_cookie(&response, "refresh_token");
    assert!(refresh.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["redirectTo"], "/interests");
}

/// A second account with the same email is rejected with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_account_duplicate_email_conflicts(pool: PgPool) {
    create_account(&pool, "taken@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "taken@example.com",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/auth/create-account", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Email lookup is case-insensitive: re-registering with different casing
/// still conflicts.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_account_email_is_normalized(pool: PgPool) {
    create_account(&pool, "casing@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "  CASING@Example.COM ",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/auth/create-account", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Passwords below the minimum length are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_account_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "short@example.com",
        "password": "short",
    });
    let response = post_json(app, "/api/auth/create-account", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Password must be at least 8 characters long");
}

/// Malformed email addresses are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_account_rejects_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    for email in ["not-an-email", "@nodomain.com", "user@nodot", "a b@x.com"] {
        let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
        let response = post_json(app.clone(), "/api/auth/create-account", body).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "email {email:?} should be rejected"
        );
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login resumes the onboarding flow at the user's current step.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_redirects_to_current_step(pool: PgPool) {
    let cookies = create_account(&pool, "partway@example.com").await;

    // Pass the first step only; the profile now sits on sub-interests.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "interests": ["Music", "Books", "Travel"] });
    let response = post_json_with_cookies(app, "/api/onboarding/interests", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&pool, "partway@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["redirectTo"], "/sub-interests");
}

/// Once onboarding is complete, login goes straight to the home page.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_after_onboarding_redirects_home(pool: PgPool) {
    let cookies = create_account(&pool, "done@example.com").await;
    pass_onboarding(&pool, &cookies).await;

    let response = login(&pool, "done@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["redirectTo"], "/");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password_unauthorized(pool: PgPool) {
    create_account(&pool, "victim@example.com").await;

    let response = login(&pool, "victim@example.com", "incorrect_password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

/// Login with an unknown email returns the same 401 as a wrong password.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_unknown_email_unauthorized(pool: PgPool) {
    let response = login(&pool, "ghost@example.com", "whatever-pass").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

/// Login to a deactivated account returns 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_inactive_account_forbidden(pool: PgPool) {
    create_account(&pool, "inactive@example.com").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE email = $1")
        .bind("inactive@example.com")
        .execute(&pool)
        .await
        .unwrap();

    let response = login(&pool, "inactive@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Account is deactivated");
}

/// Account lockout: after 5 failed attempts the account is locked, and
/// even the correct password is rejected while the lock holds.
#[sqlx::test(migrations = "../db/migrations")]
async fn account_locks_after_repeated_failures(pool: PgPool) {
    create_account(&pool, "lockme@example.com").await;

    for _ in 0..5 {
        let response = login(&pool, "lockme@example.com", "wrong_pass").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = login(&pool, "lockme@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    let error_msg = json["error"].as_str().unwrap_or("");
    assert!(
        error_msg.contains("locked"),
        "error message should mention the account is locked, got: {error_msg}"
    );
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// Refresh rotates the session: the new cookies work, the old refresh
/// token is dead the moment the new one exists.
#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_session(pool: PgPool) {
    let old_cookies = create_account(&pool, "refresher@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_with_cookies(app, "/api/auth/refresh", serde_json::json!({}), &old_cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
    let new_cookies = session_cookies(&response);
    assert_ne!(new_cookies, old_cookies, "refresh must rotate the cookies");

    // The consumed refresh token no longer resolves to a session.
    let app = common::build_test_app(pool.clone());
    let response =
        post_json_with_cookies(app, "/api/auth/refresh", serde_json::json!({}), &old_cookies).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated pair keeps working.
    let app = common::build_test_app(pool);
    let response =
        post_json_with_cookies(app, "/api/auth/refresh", serde_json::json!({}), &new_cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Refreshing with a garbage token returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_with_invalid_token_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_with_cookies(
        app,
        "/api/auth/refresh",
        serde_json::json!({}),
        "refresh_token=not-a-real-token",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing with no cookie at all returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_without_cookie_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/refresh", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout expires both cookies and revokes the stored sessions.
#[sqlx::test(migrations = "../db/migrations")]
async fn logout_clears_cookies_and_revokes_sessions(pool: PgPool) {
    let cookies = create_account(&pool, "leaver@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_with_cookies(app, "/api/auth/logout", serde_json::json!({}), &cookies).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Both cookies come back as removals.
    let access = find_set_cookie(&response, "access_token");
    assert!(access.contains("Max-Age=0"), "access cookie must expire: {access}");
    let refresh = find_set_cookie(&response, "refresh_token");
    assert!(refresh.contains("Max-Age=0"), "refresh cookie must expire: {refresh}");

    let json = body_json(response).await;
    assert_eq!(json["redirectTo"], "/");

    // The revoked session cannot be refreshed, even with the old cookie.
    let app = common::build_test_app(pool);
    let response =
        post_json_with_cookies(app, "/api/auth/refresh", serde_json::json!({}), &cookies).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session enforcement
// ---------------------------------------------------------------------------

/// API endpoints require a session cookie -- no cookie returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// A tampered access token is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn garbage_access_token_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response =
        get_with_cookies(app, "/api/profile", "access_token=not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
