//! Transcription route.
//!
//! | Method | Path              | Handler      |
//! |--------|-------------------|--------------|
//! | POST   | `/api/transcribe` | `transcribe` |

use axum::routing::post;
use axum::Router;

use crate::handlers::transcribe;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/transcribe", post(transcribe::transcribe))
}
