//! Voice transcription endpoint.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest accepted decoded audio payload.
const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    /// Base64-encoded recording.
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub mime_type: String,
}

/// POST /api/transcribe -- turn a recorded voice note into text.
///
/// Answers 503 when no transcription provider is configured; the review
/// composer falls back to typing.
pub async fn transcribe(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TranscribeRequest>,
) -> AppResult<Json<DataResponse<Value>>> {
    let Some(transcriber) = state.transcriber.clone() else {
        return Err(AppError::ServiceUnavailable(
            "Voice transcription is not configured".to_string(),
        ));
    };

    if input.audio.is_empty() {
        return Err(AppError::BadRequest("No audio data provided".to_string()));
    }
    if !input.mime_type.starts_with("audio/") {
        return Err(AppError::BadRequest(format!(
            "Unsupported audio type '{}'",
            input.mime_type
        )));
    }

    let bytes = BASE64
        .decode(input.audio.as_bytes())
        .map_err(|_| AppError::BadRequest("Invalid audio data".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("No audio data provided".to_string()));
    }
    if bytes.len() > MAX_AUDIO_BYTES {
        return Err(AppError::BadRequest(
            "Audio is too large. Maximum size is 10MB.".to_string(),
        ));
    }

    let text = transcriber
        .transcribe(&bytes, &input.mime_type)
        .await
        .map_err(|err| {
            tracing::error!(user_id = auth.user_id, error = %err, "Transcription failed");
            AppError::ServiceUnavailable("Transcription service failed".to_string())
        })?;

    tracing::debug!(
        user_id = auth.user_id,
        chars = text.chars().count(),
        "Audio transcribed"
    );
    Ok(Json(DataResponse {
        data: json!({ "text": text }),
    }))
}
