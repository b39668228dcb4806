//! Discover routes.
//!
//! | Method | Path                      | Handler            |
//! |--------|---------------------------|--------------------|
//! | GET    | `/api/discover/{section}` | `discover_section` |

use axum::routing::get;
use axum::Router;

use crate::handlers::discover;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{section}", get(discover::discover_section))
}
