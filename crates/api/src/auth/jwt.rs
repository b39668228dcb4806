//! Token minting and verification behind the session cookie pair.
//!
//! Two credentials back a login. The `access_token` cookie carries a
//! short-lived HS256 JWT that every request verifies statelessly from its
//! signature alone. The `refresh_token` cookie carries an opaque random
//! string whose SHA-256 digest is what `user_sessions` stores; the plaintext
//! never touches the database, so a leaked table cannot be replayed as a
//! session.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use vicinity_core::types::DbId;

/// Signing secret and token lifetimes, shared by minting and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for HS256 signatures.
    pub secret: String,
    /// How long a minted access token stays valid, in minutes.
    pub access_token_expiry_mins: i64,
    /// How long a refresh token (and its session row) stays valid, in days.
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default `15`) and `JWT_REFRESH_EXPIRY_DAYS` (default `7`) from the
    /// environment.
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is missing or empty. There is no safe
    /// fallback for a signing key.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

// --- Access tokens ---

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Owning user's database id.
    pub sub: DbId,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Mint time, seconds since the Unix epoch.
    pub iat: i64,
    /// Random per-token id. Distinguishes tokens minted for the same user
    /// within the same second.
    pub jti: String,
}

/// Mint a signed access token for `user_id`.
///
/// Expiry is `access_token_expiry_mins` from now; the `jti` claim is a fresh
/// UUID v4.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued = chrono::Utc::now();
    let expires = issued + chrono::Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        sub: user_id,
        exp: expires.timestamp(),
        iat: issued.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry, returning its [`Claims`].
///
/// Expiry is checked with the library's default 60-second leeway, so a token
/// is still accepted for up to a minute past `exp`.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

// --- Refresh tokens ---

/// Mint an opaque refresh token.
///
/// Returns `(plaintext, digest)`: the plaintext goes into the client's
/// cookie, the digest into the session row. [`hash_refresh_token`] maps an
/// incoming plaintext back to the stored digest on lookup.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&plaintext);
    (plaintext, digest)
}

/// SHA-256 digest of a refresh token, as lowercase hex.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-signing-key-0123456789".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = cfg();
        let token = generate_access_token(7, &config).expect("minting should succeed");

        let claims = validate_token(&token, &config).expect("verification should succeed");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_jti_is_unique_per_token() {
        let config = cfg();
        let a = generate_access_token(7, &config).unwrap();
        let b = generate_access_token(7, &config).unwrap();

        let claims_a = validate_token(&a, &config).unwrap();
        let claims_b = validate_token(&b, &config).unwrap();
        assert_ne!(
            claims_a.jti, claims_b.jti,
            "two mints for the same user must carry distinct jti claims"
        );
    }

    #[test]
    fn test_rejects_token_expired_beyond_leeway() {
        let config = cfg();

        // Hand-build a token that expired 15 minutes ago, far past the
        // 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            exp: now - 900,
            iat: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let minting = cfg();
        let verifying = JwtConfig {
            secret: "a-completely-different-key".to_string(),
            ..cfg()
        };

        let token = generate_access_token(7, &minting).unwrap();
        assert!(validate_token(&token, &verifying).is_err());
    }

    #[test]
    fn test_refresh_digest_is_stable_lowercase_hex() {
        let (plaintext, digest) = generate_refresh_token();

        assert_eq!(digest, hash_refresh_token(&plaintext));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_refresh_tokens_do_not_repeat() {
        let (plain_a, digest_a) = generate_refresh_token();
        let (plain_b, digest_b) = generate_refresh_token();
        assert_ne!(plain_a, plain_b);
        assert_ne!(digest_a, digest_b);
    }

    #[test]
    fn test_refresh_digest_known_vector() {
        // SHA-256("abc") from FIPS 180-2.
        assert_eq!(
            hash_refresh_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
