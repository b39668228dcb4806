//! Draft routes.
//!
//! | Method | Path                  | Handler  |
//! |--------|-----------------------|----------|
//! | PUT    | `/api/drafts/{scope}` | `save`   |
//! | GET    | `/api/drafts/{scope}` | `load`   |
//! | DELETE | `/api/drafts/{scope}` | `delete` |

use axum::routing::put;
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{scope}",
        put(drafts::save).get(drafts::load).delete(drafts::delete),
    )
}
