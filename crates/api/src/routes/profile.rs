//! Profile route.
//!
//! | Method | Path           | Handler       |
//! |--------|----------------|---------------|
//! | GET    | `/api/profile` | `get_profile` |

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(profile::get_profile))
}
