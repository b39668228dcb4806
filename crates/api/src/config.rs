use crate::auth::jwt::JwtConfig;

/// Runtime settings for the HTTP server, read once at startup.
///
/// Everything except the JWT secret has a local-development default, so a
/// `.env` with just `DATABASE_URL` and `JWT_SECRET` is enough to boot.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind, `0.0.0.0` unless `HOST` overrides it.
    pub host: String,
    /// TCP port, `3000` unless `PORT` overrides it.
    pub port: u16,
    /// Origins allowed by CORS, comma-separated in `CORS_ORIGINS`; defaults
    /// to the local web client dev server.
    pub cors_origins: Vec<String>,
    /// Per-request timeout enforced by the middleware stack, in seconds
    /// (`REQUEST_TIMEOUT_SECS`, default `30`).
    pub request_timeout_secs: u64,
    /// Marks session cookies `Secure`. Off by default so plain-HTTP local
    /// development keeps its cookies; set `COOKIE_SECURE=1` behind TLS.
    pub cookie_secure: bool,
    /// Signing secret and lifetimes for session tokens.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Build the config from environment variables, panicking on values
    /// that do not parse. Startup is the one place where dying loudly
    /// beats limping along with a half-read config.
    pub fn from_env() -> Self {
        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "3000")
                .parse()
                .expect("PORT must be a valid u16"),
            cors_origins: var_or("CORS_ORIGINS", "http://localhost:5173")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            request_timeout_secs: var_or("REQUEST_TIMEOUT_SECS", "30")
                .parse()
                .expect("REQUEST_TIMEOUT_SECS must be a valid u64"),
            cookie_secure: flag("COOKIE_SECURE"),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Environment variable with a fallback.
fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Boolean flag: `1` or any casing of `true` turns it on.
fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
