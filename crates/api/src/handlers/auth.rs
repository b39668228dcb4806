//! Authentication handlers: account creation, login, refresh, logout.
//!
//! Sessions are cookie-borne. Every successful auth flow ends in
//! [`start_session`], which mints the JWT access token, persists a hashed
//! refresh token, and sets both cookies. The JSON body only carries the
//! flow outcome and where the client should navigate next.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use serde::Deserialize;
use vicinity_core::error::CoreError;
use vicinity_db::models::session::CreateSession;
use vicinity_db::models::user::{CreateUser, User};
use vicinity_db::repositories::{ProfileRepo, SessionRepo, UserRepo};

use crate::auth::cookies::{clear_session_cookies, set_session_cookies, REFRESH_COOKIE};
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::FlowResponse;
use crate::state::AppState;

/// Failed logins allowed before the account locks.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long an account stays locked after too many failures.
const LOCK_DURATION_MINS: i64 = 15;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/create-account -- register and sign in straight away.
///
/// New accounts start the onboarding flow at the first step, so the
/// response points the client at its page.
pub async fn create_account(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<CreateAccountRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    if !email_is_valid(&email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address".to_string(),
        ));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    // Friendly conflict before the insert; the unique index backstops races.
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(
            CoreError::Conflict("An account with this email already exists".to_string()).into(),
        );
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))?;
    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_name(&email));

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            name,
            password_hash,
        },
    )
    .await?;
    let profile = ProfileRepo::get_or_create(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Account created");

    let (jar, response) =
        start_session(jar, &state, &user, profile.current_step().page_path()).await?;
    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);

    // 1. Look up the user.
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid email or password".to_string()))?;

    // 2. Inactive accounts cannot log in.
    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".to_string()).into());
    }

    // 3. Respect an active lockout.
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(CoreError::Forbidden(format!(
                "Account is locked until {}",
                locked_until.format("%H:%M UTC")
            ))
            .into());
        }
    }

    // 4. Verify the password.
    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;

    if !valid {
        // 5. Count the failure and lock after too many.
        let failed = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failed >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(
                user_id = user.id,
                "Account locked after repeated failed logins"
            );
        }
        return Err(CoreError::Unauthorized("Invalid email or password".to_string()).into());
    }

    // 6. Success: reset the throttle and stamp the login.
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    // 7. Route the user to wherever their onboarding left off.
    let profile = ProfileRepo::get_or_create(&state.pool, user.id).await?;
    let redirect_to = if profile.onboarding_complete {
        "/"
    } else {
        profile.current_step().page_path()
    };

    tracing::info!(user_id = user.id, "User logged in");
    let (jar, response) = start_session(jar, &state, &user, redirect_to).await?;
    Ok((jar, Json(response)))
}

/// POST /api/auth/refresh -- rotate the refresh token, mint a new access
/// token.
///
/// Reads the refresh cookie directly rather than requiring [`AuthUser`];
/// the access token is usually already expired when this is called.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> AppResult<impl IntoResponse> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| CoreError::Unauthorized("Missing refresh token".to_string()))?;

    let hash = hash_refresh_token(&token);
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    // Rotate: the old token stops working the moment the new one exists.
    let (next_token, next_hash) = generate_refresh_token();
    let next_expires_at = Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::rotate(&state.pool, session.id, &next_hash, next_expires_at)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    let access_token = generate_access_token(session.user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to generate token: {e}")))?;

    tracing::debug!(user_id = session.user_id, "Session refreshed");
    let jar = set_session_cookies(jar, access_token, next_token, &state.config);
    Ok((jar, Json(FlowResponse::ok())))
}

/// POST /api/auth/logout -- revoke every session and clear the cookies.
pub async fn logout(
    auth: AuthUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");

    let jar = clear_session_cookies(jar);
    Ok((jar, Json(FlowResponse::redirect("/"))))
}

/// Issue the token pair for a user, persist the refresh session, and set
/// both cookies. Shared by create-account and login.
async fn start_session(
    jar: CookieJar,
    state: &AppState,
    user: &User,
    redirect_to: &str,
) -> AppResult<(CookieJar, FlowResponse)> {
    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to generate token: {e}")))?;
    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    let jar = set_session_cookies(jar, access_token, refresh_token, &state.config);
    Ok((jar, FlowResponse::redirect(redirect_to)))
}

/// Lowercase and trim an email for storage and lookup.
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Minimal shape check: something before the `@`, a dotted domain after,
/// no whitespace anywhere.
fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Default display name: the email's local part.
fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
