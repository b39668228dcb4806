use std::sync::Arc;

use crate::config::ServerConfig;
use crate::transcribe::Transcriber;

/// Everything handlers reach through `State<AppState>`.
///
/// Cloned per request, so each field is either an `Arc` or a handle that
/// is itself cheap to clone (the pool is).
#[derive(Clone)]
pub struct AppState {
    pub pool: vicinity_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Voice-note transcription provider. `None` when no provider is
    /// configured; the transcribe endpoint answers 503 in that case.
    pub transcriber: Option<Arc<dyn Transcriber>>,
}
