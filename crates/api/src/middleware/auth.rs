//! Cookie-based authentication extractors.
//!
//! Both extractors read the `access_token` cookie and validate the JWT
//! inside it. They differ only in how they reject:
//!
//! - [`AuthUser`] answers with a JSON 401, for API handlers.
//! - [`PageUser`] answers with a redirect to `/login`, for page GETs where
//!   a JSON body would strand the browser.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use vicinity_core::error::CoreError;
use vicinity_core::DbId;

use crate::auth::cookies::ACCESS_COOKIE;
use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user identity for API handlers.
///
/// Add as a handler parameter to require a valid session:
///
/// ```ignore
/// async fn handler(auth: AuthUser, State(state): State<AppState>) -> ... {
///     let user_id = auth.user_id;
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, &state.config.jwt)
            .map(|user_id| AuthUser { user_id })
            .ok_or_else(|| CoreError::Unauthorized("Authentication required".to_string()).into())
    }
}

/// Authenticated user identity for page GETs.
///
/// Rejects by redirecting the browser to the login page instead of
/// returning a JSON error body.
#[derive(Debug, Clone, Copy)]
pub struct PageUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for PageUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, &state.config.jwt)
            .map(|user_id| PageUser { user_id })
            .ok_or_else(|| Redirect::to("/login"))
    }
}

/// Pull the access-token cookie out of the request and validate it.
fn authenticate(parts: &Parts, jwt: &JwtConfig) -> Option<DbId> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(ACCESS_COOKIE)?.value().to_string();
    let claims = validate_token(&token, jwt).ok()?;
    Some(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_access_token;
    use axum::http::Request;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn parts_with_cookie(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/profile");
        if let Some(value) = header {
            builder = builder.header("cookie", value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_authenticate_accepts_valid_cookie() {
        let config = test_jwt_config();
        let token = generate_access_token(42, &config).unwrap();
        let parts = parts_with_cookie(Some(&format!("access_token={token}")));
        assert_eq!(authenticate(&parts, &config), Some(42));
    }

    #[test]
    fn test_authenticate_rejects_missing_cookie() {
        let config = test_jwt_config();
        let parts = parts_with_cookie(None);
        assert_eq!(authenticate(&parts, &config), None);
    }

    #[test]
    fn test_authenticate_rejects_garbage_token() {
        let config = test_jwt_config();
        let parts = parts_with_cookie(Some("access_token=not.a.jwt"));
        assert_eq!(authenticate(&parts, &config), None);
    }

    #[test]
    fn test_authenticate_rejects_token_signed_with_other_secret() {
        let config = test_jwt_config();
        let other = JwtConfig {
            secret: "a-different-secret-entirely".to_string(),
            ..test_jwt_config()
        };
        let token = generate_access_token(42, &other).unwrap();
        let parts = parts_with_cookie(Some(&format!("access_token={token}")));
        assert_eq!(authenticate(&parts, &config), None);
    }
}
