//! Voice transcription backend.
//!
//! The review composer records audio in the browser and posts it here to
//! be turned into text. The actual speech-to-text work is behind the
//! [`Transcriber`] trait so the server runs fine without a provider
//! (the endpoint answers 503) and tests can plug in a canned one.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

/// Failure talking to the transcription provider.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("Transcription service error: {0}")]
    Upstream(String),
}

/// Turns recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, TranscribeError>;
}

/// [`Transcriber`] backed by an HTTP speech-to-text service.
///
/// Posts `{"audio": "<base64>", "mimeType": "..."}` to the configured URL
/// and expects `{"text": "..."}` back.
pub struct HttpTranscriber {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpTranscriber {
    /// Build from environment, or `None` when no provider is configured.
    ///
    /// | Env Var              | Meaning                                |
    /// |----------------------|----------------------------------------|
    /// | `TRANSCRIBE_API_URL` | Provider endpoint. Unset disables.     |
    /// | `TRANSCRIBE_API_KEY` | Optional bearer token for the provider.|
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("TRANSCRIBE_API_URL")
            .ok()
            .filter(|s| !s.is_empty())?;
        let api_key = std::env::var("TRANSCRIBE_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        Some(Self {
            client: reqwest::Client::new(),
            url,
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    text: String,
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, TranscribeError> {
        let payload = serde_json::json!({
            "audio": BASE64.encode(audio),
            "mimeType": mime_type,
        });

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TranscribeError::Upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscribeError::Upstream(format!(
                "provider returned {status}"
            )));
        }

        let body: ProviderResponse = response
            .json()
            .await
            .map_err(|err| TranscribeError::Upstream(err.to_string()))?;
        Ok(body.text)
    }
}
