//! Review routes.
//!
//! | Method | Path           | Handler         |
//! |--------|----------------|-----------------|
//! | POST   | `/api/reviews` | `create_review` |
//! | GET    | `/api/reviews` | `list_reviews`  |

use axum::routing::post;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/reviews",
        post(reviews::create_review).get(reviews::list_reviews),
    )
}
