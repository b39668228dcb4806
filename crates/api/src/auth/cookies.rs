//! The httpOnly session cookie pair.
//!
//! Sessions ride on two cookies: `access_token` (the HS256 JWT) and
//! `refresh_token` (the opaque rotation token). Both are httpOnly and
//! SameSite=Lax so scripts cannot read them and cross-site posts do not
//! carry them; `Secure` is added when the server is configured for TLS.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::ServerConfig;

/// Name of the access-token cookie.
pub const ACCESS_COOKIE: &str = "access_token";

/// Name of the refresh-token cookie.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Add the session cookie pair to a jar.
///
/// Cookie lifetimes mirror the token lifetimes from [`JwtConfig`]: the
/// browser drops each cookie around the time its token stops being valid.
///
/// [`JwtConfig`]: crate::auth::jwt::JwtConfig
pub fn set_session_cookies(
    jar: CookieJar,
    access_token: String,
    refresh_token: String,
    config: &ServerConfig,
) -> CookieJar {
    let access = session_cookie(
        ACCESS_COOKIE,
        access_token,
        Duration::minutes(config.jwt.access_token_expiry_mins),
        config,
    );
    let refresh = session_cookie(
        REFRESH_COOKIE,
        refresh_token,
        Duration::days(config.jwt.refresh_token_expiry_days),
        config,
    );
    jar.add(access).add(refresh)
}

/// Expire both session cookies (logout).
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(ACCESS_COOKIE))
        .remove(removal_cookie(REFRESH_COOKIE))
}

fn session_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    config: &ServerConfig,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(max_age)
        .build()
}

// The removal cookie must carry the same path as the original or the
// browser keeps the live one.
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}
