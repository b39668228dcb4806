//! HTTP-level integration tests for the voice transcription endpoint.
//!
//! The speech-to-text provider sits behind the `Transcriber` trait, so
//! these tests wire in canned implementations instead of a real service.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, create_account, post_json_with_cookies};
use sqlx::PgPool;
use vicinity_api::transcribe::{TranscribeError, Transcriber};

/// Always answers with a fixed transcript.
struct CannedTranscriber;

#[async_trait]
impl Transcriber for CannedTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str) -> Result<String, TranscribeError> {
        Ok("I loved the tiramisu.".to_string())
    }
}

/// Always fails, standing in for a provider outage.
struct BrokenTranscriber;

#[async_trait]
impl Transcriber for BrokenTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str) -> Result<String, TranscribeError> {
        Err(TranscribeError::Upstream("connection refused".to_string()))
    }
}

/// Base64 for "hello" -- small but valid audio payload.
const AUDIO_B64: &str = "aGVsbG8=";

// ---------------------------------------------------------------------------
// Test: provider wiring
// ---------------------------------------------------------------------------

/// With a provider wired in, the endpoint returns its transcript.
#[sqlx::test(migrations = "../db/migrations")]
async fn transcribe_returns_provider_text(pool: PgPool) {
    let cookies = create_account(&pool, "speaker@example.com").await;

    let app = common::build_app_with(pool, Some(Arc::new(CannedTranscriber)));
    let body = serde_json::json!({ "audio": AUDIO_B64, "mimeType": "audio/webm" });
    let response = post_json_with_cookies(app, "/api/transcribe", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["text"], "I loved the tiramisu.");
}

/// Without a provider the endpoint degrades to 503 so the composer can
/// fall back to typing.
#[sqlx::test(migrations = "../db/migrations")]
async fn unconfigured_transcription_returns_503(pool: PgPool) {
    let cookies = create_account(&pool, "quiet@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "audio": AUDIO_B64, "mimeType": "audio/webm" });
    let response = post_json_with_cookies(app, "/api/transcribe", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Voice transcription is not configured");
}

/// A provider failure is the service's problem, not the caller's.
#[sqlx::test(migrations = "../db/migrations")]
async fn provider_failure_returns_503(pool: PgPool) {
    let cookies = create_account(&pool, "unlucky@example.com").await;

    let app = common::build_app_with(pool, Some(Arc::new(BrokenTranscriber)));
    let body = serde_json::json!({ "audio": AUDIO_B64, "mimeType": "audio/webm" });
    let response = post_json_with_cookies(app, "/api/transcribe", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Transcription service failed");
}

// ---------------------------------------------------------------------------
// Test: input validation
// ---------------------------------------------------------------------------

/// Bad or missing audio is rejected before the provider is consulted.
#[sqlx::test(migrations = "../db/migrations")]
async fn audio_payload_is_validated(pool: PgPool) {
    let cookies = create_account(&pool, "mumbler@example.com").await;
    let app = common::build_app_with(pool, Some(Arc::new(CannedTranscriber)));

    // Empty audio.
    let body = serde_json::json!({ "audio": "", "mimeType": "audio/webm" });
    let response = post_json_with_cookies(app.clone(), "/api/transcribe", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No audio data provided");

    // Not base64.
    let body = serde_json::json!({ "audio": "!!!not-base64!!!", "mimeType": "audio/webm" });
    let response = post_json_with_cookies(app.clone(), "/api/transcribe", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid audio data");

    // Wrong media type.
    let body = serde_json::json!({ "audio": AUDIO_B64, "mimeType": "video/mp4" });
    let response = post_json_with_cookies(app, "/api/transcribe", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unsupported audio type 'video/mp4'");
}

/// Transcription is a protected surface.
#[sqlx::test(migrations = "../db/migrations")]
async fn transcribe_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "audio": AUDIO_B64, "mimeType": "audio/webm" });
    let response = common::post_json(app, "/api/transcribe", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
