//! Onboarding routes: step submissions under `/api/onboarding`, step
//! pages at the site root.
//!
//! | Method | Path                            | Handler                |
//! |--------|---------------------------------|------------------------|
//! | POST   | `/api/onboarding/interests`     | `submit_interests`     |
//! | POST   | `/api/onboarding/sub-interests` | `submit_sub_interests` |
//! | POST   | `/api/onboarding/dealbreakers`  | `submit_dealbreakers`  |
//! | POST   | `/api/onboarding/complete`      | `complete_onboarding`  |
//! | GET    | `/onboarding`                   | `onboarding_entry`     |
//! | GET    | `/interests`                    | `interests_page`       |
//! | GET    | `/sub-interests`                | `sub_interests_page`   |
//! | GET    | `/dealbreakers`                 | `dealbreakers_page`    |
//! | GET    | `/complete`                     | `complete_page`        |

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Step submission routes, nested under `/api/onboarding`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/interests", post(onboarding::submit_interests))
        .route("/sub-interests", post(onboarding::submit_sub_interests))
        .route("/dealbreakers", post(onboarding::submit_dealbreakers))
        .route("/complete", post(onboarding::complete_onboarding))
}

/// Step page routes, merged at the site root.
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/onboarding", get(onboarding::onboarding_entry))
        .route("/interests", get(onboarding::interests_page))
        .route("/sub-interests", get(onboarding::sub_interests_page))
        .route("/dealbreakers", get(onboarding::dealbreakers_page))
        .route("/complete", get(onboarding::complete_page))
}
