//! Onboarding flow handlers.
//!
//! The flow is a fixed step sequence gated by the profile's furthest step.
//! Page GETs redirect when a step is not reachable; step POSTs answer 409
//! with a corrective redirect instead, since the client posted from a page
//! it should not have been on. Submitting the current step advances the
//! profile; re-submitting an already-passed step just re-saves the answer.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use vicinity_core::draft::DraftScope;
use vicinity_core::error::CoreError;
use vicinity_core::onboarding::{
    answers_complete, can_access, dealbreaker_label, dealbreakers_hint, dealbreakers_max_hint,
    dealbreakers_status, interests_button_label, interests_max_feedback, interests_status,
    validate_dealbreakers, validate_interests, validate_sub_interests, DEALBREAKERS,
    DEALBREAKER_LIMITS, INTERESTS, INTEREST_LIMITS, MIN_PER_CATEGORY, SUB_INTEREST_CATEGORIES,
};
use vicinity_core::selection::CategorySelections;
use vicinity_core::{DbId, OnboardingStep};
use vicinity_db::models::profile::UserProfile;
use vicinity_db::repositories::ProfileRepo;

use crate::drafts::{clear_draft, clear_onboarding_drafts, load_draft};
use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, PageUser};
use crate::response::{DataResponse, FlowResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Step pages (GET)
// ---------------------------------------------------------------------------

/// GET /onboarding -- forward to wherever the user's flow left off.
pub async fn onboarding_entry(
    user: PageUser,
    State(state): State<AppState>,
) -> AppResult<Redirect> {
    let profile = ProfileRepo::get_or_create(&state.pool, user.user_id).await?;
    let target = if profile.onboarding_complete {
        "/"
    } else {
        profile.current_step().page_path()
    };
    Ok(Redirect::to(target))
}

/// GET /interests
pub async fn interests_page(user: PageUser, State(state): State<AppState>) -> AppResult<Response> {
    step_page(&state, user.user_id, OnboardingStep::Interests).await
}

/// GET /sub-interests
pub async fn sub_interests_page(
    user: PageUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    step_page(&state, user.user_id, OnboardingStep::SubInterests).await
}

/// GET /dealbreakers
pub async fn dealbreakers_page(
    user: PageUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    step_page(&state, user.user_id, OnboardingStep::Dealbreakers).await
}

/// GET /complete
pub async fn complete_page(user: PageUser, State(state): State<AppState>) -> AppResult<Response> {
    step_page(&state, user.user_id, OnboardingStep::Complete).await
}

/// Render one step page, or redirect to the current step when the
/// requested one is still locked.
async fn step_page(state: &AppState, user_id: DbId, step: OnboardingStep) -> AppResult<Response> {
    let profile = ProfileRepo::get_or_create(&state.pool, user_id).await?;
    let current = profile.current_step();
    if !can_access(current, step) {
        return Ok(Redirect::to(current.page_path()).into_response());
    }

    let draft = match DraftScope::for_step(step) {
        Some(scope) => load_draft(&state.pool, user_id, scope, None).await,
        None => None,
    };

    let data = match step {
        OnboardingStep::Interests => interests_payload(&profile, draft),
        OnboardingStep::SubInterests => sub_interests_payload(&profile, draft),
        OnboardingStep::Dealbreakers => dealbreakers_payload(&profile, draft),
        OnboardingStep::Complete => complete_payload(&profile),
    };
    Ok(Json(DataResponse { data }).into_response())
}

fn interests_payload(profile: &UserProfile, draft: Option<Value>) -> Value {
    let selected = profile.interests.len();
    json!({
        "step": OnboardingStep::Interests.as_str(),
        "title": OnboardingStep::Interests.label(),
        "catalog": INTERESTS,
        "limits": { "min": INTEREST_LIMITS.min, "max": INTEREST_LIMITS.max },
        "saved": profile.interests,
        "draft": draft,
        "buttonLabel": interests_button_label(selected),
        "status": interests_status(selected),
        "maxFeedback": interests_max_feedback(),
        "continueEnabled": INTEREST_LIMITS.satisfied_by(selected),
    })
}

fn sub_interests_payload(profile: &UserProfile, draft: Option<Value>) -> Value {
    let categories: Vec<Value> = SUB_INTEREST_CATEGORIES
        .iter()
        .map(|(id, label)| json!({ "id": id, "label": label }))
        .collect();

    let mut selections = CategorySelections::new(SUB_INTEREST_CATEGORIES, MIN_PER_CATEGORY);
    selections.restore(&sub_interest_map(profile));

    json!({
        "step": OnboardingStep::SubInterests.as_str(),
        "title": OnboardingStep::SubInterests.label(),
        "categories": categories,
        "minPerCategory": MIN_PER_CATEGORY,
        "saved": profile.sub_interests,
        "draft": draft,
        "status": selections.status_message(),
        "continueEnabled": selections.continue_enabled(),
    })
}

fn dealbreakers_payload(profile: &UserProfile, draft: Option<Value>) -> Value {
    let options: Vec<Value> = DEALBREAKERS
        .iter()
        .map(|(id, label)| json!({ "id": id, "label": label }))
        .collect();
    let selected = profile.dealbreakers.len();
    json!({
        "step": OnboardingStep::Dealbreakers.as_str(),
        "title": OnboardingStep::Dealbreakers.label(),
        "options": options,
        "limits": { "min": DEALBREAKER_LIMITS.min, "max": DEALBREAKER_LIMITS.max },
        "saved": profile.dealbreakers,
        "draft": draft,
        "hint": dealbreakers_hint(selected),
        "status": dealbreakers_status(selected),
        "maxHint": dealbreakers_max_hint(),
        "continueEnabled": DEALBREAKER_LIMITS.satisfied_by(selected),
    })
}

fn complete_payload(profile: &UserProfile) -> Value {
    let dealbreakers: Vec<Value> = profile
        .dealbreakers
        .iter()
        .map(|id| json!({ "id": id, "label": dealbreaker_label(id) }))
        .collect();
    let subs = sub_interest_map(profile);
    json!({
        "step": OnboardingStep::Complete.as_str(),
        "title": OnboardingStep::Complete.label(),
        "summary": {
            "interests": profile.interests,
            "subInterests": profile.sub_interests,
            "dealbreakers": dealbreakers,
        },
        "ready": answers_complete(&profile.interests, &subs, &profile.dealbreakers),
        "complete": profile.onboarding_complete,
    })
}

// ---------------------------------------------------------------------------
// Step submissions (POST)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct InterestsSubmission {
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubInterestsSubmission {
    #[serde(default)]
    pub sub_interests: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DealbreakersSubmission {
    #[serde(default)]
    pub dealbreakers: Vec<String>,
}

/// POST /api/onboarding/interests
pub async fn submit_interests(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<InterestsSubmission>,
) -> AppResult<Json<FlowResponse>> {
    let profile = reachable_profile(&state, auth.user_id, OnboardingStep::Interests).await?;
    let cleaned = validate_interests(&input.interests)?;

    ProfileRepo::set_interests(&state.pool, auth.user_id, &cleaned).await?;
    let landed = advance_past(&state, auth.user_id, &profile, OnboardingStep::Interests).await?;
    clear_draft(&state.pool, auth.user_id, DraftScope::Interests).await;

    tracing::info!(user_id = auth.user_id, count = cleaned.len(), "Interests saved");
    Ok(Json(FlowResponse::redirect(redirect_after(&profile, landed))))
}

/// POST /api/onboarding/sub-interests
pub async fn submit_sub_interests(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubInterestsSubmission>,
) -> AppResult<Json<FlowResponse>> {
    let profile = reachable_profile(&state, auth.user_id, OnboardingStep::SubInterests).await?;
    let cleaned = validate_sub_interests(&input.sub_interests)?;
    let value = serde_json::to_value(&cleaned)
        .map_err(|e| AppError::InternalError(format!("Failed to encode selections: {e}")))?;

    ProfileRepo::set_sub_interests(&state.pool, auth.user_id, &value).await?;
    let landed = advance_past(&state, auth.user_id, &profile, OnboardingStep::SubInterests).await?;
    clear_draft(&state.pool, auth.user_id, DraftScope::SubInterests).await;

    tracing::info!(user_id = auth.user_id, "Sub-interests saved");
    Ok(Json(FlowResponse::redirect(redirect_after(&profile, landed))))
}

/// POST /api/onboarding/dealbreakers
pub async fn submit_dealbreakers(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DealbreakersSubmission>,
) -> AppResult<Json<FlowResponse>> {
    let profile = reachable_profile(&state, auth.user_id, OnboardingStep::Dealbreakers).await?;
    let cleaned = validate_dealbreakers(&input.dealbreakers)?;

    ProfileRepo::set_dealbreakers(&state.pool, auth.user_id, &cleaned).await?;
    let landed = advance_past(&state, auth.user_id, &profile, OnboardingStep::Dealbreakers).await?;
    clear_draft(&state.pool, auth.user_id, DraftScope::Dealbreakers).await;

    tracing::info!(user_id = auth.user_id, count = cleaned.len(), "Deal-breakers saved");
    Ok(Json(FlowResponse::redirect(redirect_after(&profile, landed))))
}

/// POST /api/onboarding/complete -- finish the flow.
///
/// Only valid once every selection step holds a passing answer; the
/// completion flag never goes up around a half-finished profile.
pub async fn complete_onboarding(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<FlowResponse>> {
    let profile = reachable_profile(&state, auth.user_id, OnboardingStep::Complete).await?;

    let subs = sub_interest_map(&profile);
    if !answers_complete(&profile.interests, &subs, &profile.dealbreakers) {
        return Err(CoreError::Conflict(
            "Please finish every onboarding step before completing".to_string(),
        )
        .into());
    }

    ProfileRepo::mark_complete(&state.pool, auth.user_id).await?;
    clear_onboarding_drafts(&state.pool, auth.user_id).await;

    tracing::info!(user_id = auth.user_id, "Onboarding complete");
    Ok(Json(FlowResponse::redirect("/")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the caller's profile and reject with a corrective 409 when the
/// posted step is ahead of their progress.
async fn reachable_profile(
    state: &AppState,
    user_id: DbId,
    step: OnboardingStep,
) -> AppResult<UserProfile> {
    let profile = ProfileRepo::get_or_create(&state.pool, user_id).await?;
    let current = profile.current_step();
    if !can_access(current, step) {
        return Err(AppError::StepLocked {
            redirect_to: current.page_path().to_string(),
        });
    }
    Ok(profile)
}

/// Advance past `step` when it is the current one, returning the step the
/// profile ends up on. Editing an already-passed step changes nothing.
async fn advance_past(
    state: &AppState,
    user_id: DbId,
    profile: &UserProfile,
    step: OnboardingStep,
) -> AppResult<OnboardingStep> {
    let current = profile.current_step();
    if current != step {
        return Ok(current);
    }
    let Some(next) = step.next() else {
        return Ok(current);
    };

    // Compare-and-set; a concurrent post of the same step may have won.
    if let Some(updated) = ProfileRepo::advance_step(&state.pool, user_id, step, next).await? {
        return Ok(updated.current_step());
    }
    let fresh = ProfileRepo::get_or_create(&state.pool, user_id).await?;
    Ok(fresh.current_step())
}

/// Where a step submission sends the client: onward through the flow, or
/// home when the profile already finished onboarding.
fn redirect_after(profile: &UserProfile, landed: OnboardingStep) -> &'static str {
    if profile.onboarding_complete {
        "/"
    } else {
        landed.page_path()
    }
}

/// The saved sub-interest map. Unreadable stored JSON reads as empty.
fn sub_interest_map(profile: &UserProfile) -> BTreeMap<String, Vec<String>> {
    serde_json::from_value(profile.sub_interests.clone()).unwrap_or_default()
}
