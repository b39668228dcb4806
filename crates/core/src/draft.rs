//! Draft scopes and snapshot rules.
//!
//! In-progress page state is saved per user under a scope key so it
//! survives interruption. Loading is forgiving by contract: an absent,
//! corrupt, or out-of-scope snapshot counts as "no draft", never as an
//! error. A review draft is additionally scoped to one place and must not
//! surface for a different one.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::onboarding::OnboardingStep;

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

/// The draft scopes the app persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftScope {
    Interests,
    SubInterests,
    Dealbreakers,
    Review,
}

/// All scopes.
pub const SCOPES: &[DraftScope] = &[
    DraftScope::Interests,
    DraftScope::SubInterests,
    DraftScope::Dealbreakers,
    DraftScope::Review,
];

impl DraftScope {
    /// Parse a scope key from storage or a route path.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "user-interests" => Ok(Self::Interests),
            "user-sub-interests" => Ok(Self::SubInterests),
            "dealbreakers" => Ok(Self::Dealbreakers),
            "review_draft" => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid draft scope '{s}'. Must be one of: user-interests, user-sub-interests, dealbreakers, review_draft"
            ))),
        }
    }

    /// Convert to the storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interests => "user-interests",
            Self::SubInterests => "user-sub-interests",
            Self::Dealbreakers => "dealbreakers",
            Self::Review => "review_draft",
        }
    }

    /// The scope holding in-progress state for an onboarding step, if any.
    pub fn for_step(step: OnboardingStep) -> Option<DraftScope> {
        match step {
            OnboardingStep::Interests => Some(Self::Interests),
            OnboardingStep::SubInterests => Some(Self::SubInterests),
            OnboardingStep::Dealbreakers => Some(Self::Dealbreakers),
            OnboardingStep::Complete => None,
        }
    }

    /// Scopes cleared when onboarding completes.
    pub fn onboarding_scopes() -> &'static [DraftScope] {
        &[Self::Interests, Self::SubInterests, Self::Dealbreakers]
    }
}

// ---------------------------------------------------------------------------
// Snapshot rules
// ---------------------------------------------------------------------------

/// A snapshot must be a JSON object; anything else is treated as corrupt.
pub fn snapshot_is_well_formed(snapshot: &serde_json::Value) -> bool {
    snapshot.is_object()
}

/// Whether a snapshot belongs to the requested place.
///
/// Only review drafts carry a place. When `place_id` is given, the
/// snapshot's `placeId` must match exactly; a missing or different value
/// means the draft is for somewhere else and must not be shown.
pub fn snapshot_matches_place(
    scope: DraftScope,
    snapshot: &serde_json::Value,
    place_id: Option<&str>,
) -> bool {
    if scope != DraftScope::Review {
        return true;
    }
    let Some(requested) = place_id else {
        return true;
    };
    snapshot
        .get("placeId")
        .and_then(|v| v.as_str())
        .map_or(false, |saved| saved == requested)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
