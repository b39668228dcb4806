//! Authentication routes.
//!
//! | Method | Path                       | Handler          |
//! |--------|----------------------------|------------------|
//! | POST   | `/api/auth/create-account` | `create_account` |
//! | POST   | `/api/auth/login`          | `login`          |
//! | POST   | `/api/auth/refresh`        | `refresh`        |
//! | POST   | `/api/auth/logout`         | `logout`         |

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-account", post(auth::create_account))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
