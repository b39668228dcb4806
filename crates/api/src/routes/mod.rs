//! Route table.
//!
//! API routes (nested under `/api`):
//!
//! | Method | Path                            | Handler                |
//! |--------|---------------------------------|------------------------|
//! | POST   | `/api/auth/create-account`      | `create_account`       |
//! | POST   | `/api/auth/login`               | `login`                |
//! | POST   | `/api/auth/refresh`             | `refresh`              |
//! | POST   | `/api/auth/logout`              | `logout`               |
//! | POST   | `/api/onboarding/interests`     | `submit_interests`     |
//! | POST   | `/api/onboarding/sub-interests` | `submit_sub_interests` |
//! | POST   | `/api/onboarding/dealbreakers`  | `submit_dealbreakers`  |
//! | POST   | `/api/onboarding/complete`      | `complete_onboarding`  |
//! | PUT    | `/api/drafts/{scope}`           | `save`                 |
//! | GET    | `/api/drafts/{scope}`           | `load`                 |
//! | DELETE | `/api/drafts/{scope}`           | `delete`               |
//! | POST   | `/api/reviews`                  | `create_review`        |
//! | GET    | `/api/reviews`                  | `list_reviews`         |
//! | POST   | `/api/transcribe`               | `transcribe`           |
//! | GET    | `/api/discover/{section}`       | `discover_section`     |
//! | GET    | `/api/profile`                  | `get_profile`          |
//!
//! Page routes (served at the site root; GETs that redirect rather than
//! answer JSON errors): `/onboarding`, `/interests`, `/sub-interests`,
//! `/dealbreakers`, `/complete`. The health probe lives at `/health`.

pub mod auth;
pub mod discover;
pub mod drafts;
pub mod health;
pub mod onboarding;
pub mod profile;
pub mod reviews;
pub mod transcribe;

use axum::Router;

use crate::state::AppState;

/// Assemble all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/onboarding", onboarding::router())
        .nest("/drafts", drafts::router())
        .nest("/discover", discover::router())
        .merge(reviews::router())
        .merge(transcribe::router())
        .merge(profile::router())
}

/// Assemble the page routes served at the site root.
pub fn page_routes() -> Router<AppState> {
    onboarding::page_router()
}
