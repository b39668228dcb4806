//! User profile model: onboarding progress and the saved answers.

use sqlx::FromRow;
use vicinity_core::types::{DbId, Timestamp};
use vicinity_core::OnboardingStep;

/// A profile row from the `user_profiles` table.
///
/// `onboarding_step` is the furthest step the user has reached, stored as
/// its wire string. A null or unparseable value reads as the first step.
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub onboarding_step: Option<String>,
    pub onboarding_complete: bool,
    pub interests: Vec<String>,
    pub sub_interests: serde_json::Value,
    pub dealbreakers: Vec<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    /// The step this profile currently sits on.
    pub fn current_step(&self) -> OnboardingStep {
        self.onboarding_step
            .as_deref()
            .and_then(|s| OnboardingStep::from_str_db(s).ok())
            .unwrap_or(OnboardingStep::FIRST)
    }
}
