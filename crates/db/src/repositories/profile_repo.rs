//! Repository for the `user_profiles` table.

use sqlx::PgPool;
use vicinity_core::types::DbId;
use vicinity_core::OnboardingStep;

use crate::models::profile::UserProfile;

/// Column list for `user_profiles` queries.
const COLUMNS: &str = "\
    id, user_id, onboarding_step, onboarding_complete, interests, \
    sub_interests, dealbreakers, completed_at, created_at, updated_at";

/// Provides profile storage: onboarding progress and the saved answers.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Get the profile for a user, creating one at the first step if it
    /// does not exist yet (upsert pattern).
    ///
    /// Uses a no-op `DO UPDATE` to guarantee `RETURNING` always produces
    /// a row.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (user_id) \
             VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = user_profiles.user_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find the profile for a user without creating one.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the saved interests.
    pub async fn set_interests(
        pool: &PgPool,
        user_id: DbId,
        interests: &[String],
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles SET interests = $2, updated_at = NOW() \
             WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(interests)
            .fetch_one(pool)
            .await
    }

    /// Replace the saved sub-interest selections (category id to chip ids).
    pub async fn set_sub_interests(
        pool: &PgPool,
        user_id: DbId,
        sub_interests: &serde_json::Value,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles SET sub_interests = $2, updated_at = NOW() \
             WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(sub_interests)
            .fetch_one(pool)
            .await
    }

    /// Replace the saved deal-breakers.
    pub async fn set_dealbreakers(
        pool: &PgPool,
        user_id: DbId,
        dealbreakers: &[String],
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles SET dealbreakers = $2, updated_at = NOW() \
             WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(dealbreakers)
            .fetch_one(pool)
            .await
    }

    /// Advance the onboarding step with a compare-and-set.
    ///
    /// The update only applies while the stored step still equals `from`,
    /// so two concurrent posts of the same step cannot advance twice.
    /// Returns `None` when the step had already moved.
    pub async fn advance_step(
        pool: &PgPool,
        user_id: DbId,
        from: OnboardingStep,
        to: OnboardingStep,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles SET onboarding_step = $3, updated_at = NOW() \
             WHERE user_id = $1 AND onboarding_step = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Mark onboarding complete. Idempotent: the completion time is kept
    /// from the first call.
    pub async fn mark_complete(pool: &PgPool, user_id: DbId) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles \
             SET onboarding_complete = TRUE, \
                 onboarding_step = $2, \
                 completed_at = COALESCE(completed_at, NOW()), \
                 updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(OnboardingStep::Complete.as_str())
            .fetch_one(pool)
            .await
    }
}
