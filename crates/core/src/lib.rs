//! Vicinity domain logic.
//!
//! Pure rules shared by the API and repository layers: the onboarding step
//! machine, selection limits, review validation, draft scoping, and the
//! discover section/filter model. Nothing in this crate performs I/O.

pub mod discover;
pub mod draft;
pub mod error;
pub mod onboarding;
pub mod review;
pub mod selection;
pub mod types;

pub use error::CoreError;
pub use onboarding::OnboardingStep;
pub use types::{DbId, Timestamp};
