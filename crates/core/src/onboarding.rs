//! Onboarding flow steps, option catalogs, and step-data validation.
//!
//! The onboarding flow is a fixed sequence: interests, sub-interests,
//! deal-breakers, then a completion summary. A profile records the furthest
//! step reached; earlier steps stay reachable for edits while later steps
//! are locked until every step before them has been passed. Validation here
//! is the authoritative copy of the rules the pages mirror client-side.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::selection::SelectionLimits;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The four steps of the onboarding flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    Interests,
    SubInterests,
    Dealbreakers,
    Complete,
}

/// All steps in flow order.
pub const STEPS: &[OnboardingStep] = &[
    OnboardingStep::Interests,
    OnboardingStep::SubInterests,
    OnboardingStep::Dealbreakers,
    OnboardingStep::Complete,
];

impl OnboardingStep {
    /// The step a brand-new profile starts on.
    pub const FIRST: OnboardingStep = OnboardingStep::Interests;

    /// Parse a step string from the database or a route path.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "interests" => Ok(Self::Interests),
            "sub-interests" => Ok(Self::SubInterests),
            "dealbreakers" => Ok(Self::Dealbreakers),
            "complete" => Ok(Self::Complete),
            _ => Err(CoreError::Validation(format!(
                "Invalid onboarding step '{s}'. Must be one of: interests, sub-interests, dealbreakers, complete"
            ))),
        }
    }

    /// Convert to the database / wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interests => "interests",
            Self::SubInterests => "sub-interests",
            Self::Dealbreakers => "dealbreakers",
            Self::Complete => "complete",
        }
    }

    /// Zero-based position in the flow.
    pub fn position(&self) -> usize {
        match self {
            Self::Interests => 0,
            Self::SubInterests => 1,
            Self::Dealbreakers => 2,
            Self::Complete => 3,
        }
    }

    /// The step after this one, or `None` for the final step.
    pub fn next(&self) -> Option<OnboardingStep> {
        STEPS.get(self.position() + 1).copied()
    }

    /// Path of the page that renders this step.
    pub fn page_path(&self) -> &'static str {
        match self {
            Self::Interests => "/interests",
            Self::SubInterests => "/sub-interests",
            Self::Dealbreakers => "/dealbreakers",
            Self::Complete => "/complete",
        }
    }

    /// Human-readable label for the step.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Interests => "Interests",
            Self::SubInterests => "Sub-interests",
            Self::Dealbreakers => "Deal-breakers",
            Self::Complete => "Complete",
        }
    }
}

/// Whether a user whose profile sits on `current` may open `requested`.
///
/// Steps already passed (and the current step itself) stay reachable;
/// anything further ahead is locked.
pub fn can_access(current: OnboardingStep, requested: OnboardingStep) -> bool {
    requested.position() <= current.position()
}

// ---------------------------------------------------------------------------
// Option catalogs
// ---------------------------------------------------------------------------

/// The interest bubbles offered on the first step.
pub const INTERESTS: &[&str] = &[
    "Food & Dining",
    "Shopping",
    "Entertainment",
    "Travel",
    "Technology",
    "Sports",
    "Health & Fitness",
    "Arts & Culture",
    "Music",
    "Books",
    "Fashion",
    "Beauty",
    "Automotive",
    "Home & Garden",
    "Photography",
    "Gaming",
    "Education",
    "Business",
    "Finance",
    "Nature",
];

/// Selection bounds for the interests step. One authoritative range; the
/// client mirrors it for instant feedback.
pub const INTEREST_LIMITS: SelectionLimits = SelectionLimits::new(3, Some(8));

/// Sub-interest categories as `(id, label)` pairs. Each category needs at
/// least one chip selected before the step can be passed.
pub const SUB_INTEREST_CATEGORIES: &[(&str, &str)] = &[
    ("food-drink", "Food & Drink"),
    ("arts-culture", "Arts & Culture"),
];

/// Minimum chips per sub-interest category.
pub const MIN_PER_CATEGORY: usize = 1;

/// Deal-breaker cards as `(id, label)` pairs.
pub const DEALBREAKERS: &[(&str, &str)] = &[
    ("trust", "Trust"),
    ("punctuality", "Punctuality"),
    ("friendliness", "Friendliness"),
    ("pricing", "Pricing"),
];

/// Selection bounds for the deal-breakers step.
pub const DEALBREAKER_LIMITS: SelectionLimits = SelectionLimits::new(2, Some(3));

/// Label for a sub-interest category id.
pub fn category_label(id: &str) -> Option<&'static str> {
    SUB_INTEREST_CATEGORIES
        .iter()
        .find(|(cat, _)| *cat == id)
        .map(|(_, label)| *label)
}

/// Label for a deal-breaker id.
pub fn dealbreaker_label(id: &str) -> Option<&'static str> {
    DEALBREAKERS
        .iter()
        .find(|(db, _)| *db == id)
        .map(|(_, label)| *label)
}

// ---------------------------------------------------------------------------
// Step-data validation
// ---------------------------------------------------------------------------

/// Validate the interests step payload.
///
/// Duplicates collapse to set semantics before the bounds are applied.
/// Returns the distinct selections in catalog-stable order.
pub fn validate_interests(interests: &[String]) -> Result<Vec<String>, CoreError> {
    let mut distinct = BTreeSet::new();
    for interest in interests {
        if !INTERESTS.contains(&interest.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown interest '{interest}'"
            )));
        }
        distinct.insert(interest.clone());
    }

    if !INTEREST_LIMITS.satisfied_by(distinct.len()) {
        return Err(CoreError::Validation(format!(
            "Select between {} and {} interests ({} given)",
            INTEREST_LIMITS.min,
            INTEREST_LIMITS.max.unwrap_or(usize::MAX),
            distinct.len()
        )));
    }

    // Preserve the catalog's display order rather than submission order.
    Ok(INTERESTS
        .iter()
        .filter(|i| distinct.contains(**i))
        .map(|i| i.to_string())
        .collect())
}

/// Validate the sub-interests step payload: a map of category id to the
/// chip ids selected within it.
///
/// Every configured category must be present with at least one chip;
/// unknown categories and blank chip ids are rejected. Returns the
/// selections with duplicates removed.
pub fn validate_sub_interests(
    selections: &BTreeMap<String, Vec<String>>,
) -> Result<BTreeMap<String, Vec<String>>, CoreError> {
    for category in selections.keys() {
        if category_label(category).is_none() {
            return Err(CoreError::Validation(format!(
                "Unknown sub-interest category '{category}'"
            )));
        }
    }

    let mut cleaned = BTreeMap::new();
    let mut missing = Vec::new();
    for (category, label) in SUB_INTEREST_CATEGORIES {
        let chips = selections.get(*category).map(Vec::as_slice).unwrap_or(&[]);

        let mut distinct = BTreeSet::new();
        for chip in chips {
            if chip.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Sub-interest selections in '{category}' must be non-empty"
                )));
            }
            distinct.insert(chip.clone());
        }

        if distinct.len() < MIN_PER_CATEGORY {
            missing.push(*label);
        } else {
            cleaned.insert(category.to_string(), distinct.into_iter().collect());
        }
    }

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Please select at least one option in: {}",
            missing.join(", ")
        )));
    }

    Ok(cleaned)
}

/// Validate the deal-breakers step payload. Returns the distinct
/// selections in catalog order.
pub fn validate_dealbreakers(ids: &[String]) -> Result<Vec<String>, CoreError> {
    let mut distinct = BTreeSet::new();
    for id in ids {
        if dealbreaker_label(id).is_none() {
            return Err(CoreError::Validation(format!(
                "Unknown deal-breaker '{id}'"
            )));
        }
        distinct.insert(id.clone());
    }

    if !DEALBREAKER_LIMITS.satisfied_by(distinct.len()) {
        return Err(CoreError::Validation(format!(
            "Select between {} and {} deal-breakers ({} given)",
            DEALBREAKER_LIMITS.min,
            DEALBREAKER_LIMITS.max.unwrap_or(usize::MAX),
            distinct.len()
        )));
    }

    Ok(DEALBREAKERS
        .iter()
        .filter(|(id, _)| distinct.contains(*id))
        .map(|(id, _)| id.to_string())
        .collect())
}

/// The completion invariant: a profile may be marked complete only when
/// every selection step holds a valid answer.
pub fn answers_complete(
    interests: &[String],
    sub_interests: &BTreeMap<String, Vec<String>>,
    dealbreakers: &[String],
) -> bool {
    validate_interests(interests).is_ok()
        && validate_sub_interests(sub_interests).is_ok()
        && validate_dealbreakers(dealbreakers).is_ok()
}

// ---------------------------------------------------------------------------
// Step page copy
// ---------------------------------------------------------------------------

/// Next-button label on the interests step.
pub fn interests_button_label(count: usize) -> String {
    if count >= INTEREST_LIMITS.min {
        "Next".to_string()
    } else {
        format!("Select {} more", INTEREST_LIMITS.min - count)
    }
}

/// Screen-reader status line for the interests step.
pub fn interests_status(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    if count < INTEREST_LIMITS.min {
        format!(
            "{count} interest{plural} selected. Select at least {} more to continue.",
            INTEREST_LIMITS.min - count
        )
    } else {
        format!("{count} interest{plural} selected. You can now continue to the next step.")
    }
}

/// Feedback when a selection beyond the interests maximum is rejected.
pub fn interests_max_feedback() -> String {
    format!(
        "Maximum of {} interests can be selected",
        INTEREST_LIMITS.max.unwrap_or(usize::MAX)
    )
}

/// Hint line under the deal-breaker grid.
pub fn dealbreakers_hint(count: usize) -> String {
    let min = DEALBREAKER_LIMITS.min;
    let max = DEALBREAKER_LIMITS.max.unwrap_or(usize::MAX);
    if count == 0 {
        format!("Select {min}\u{2013}{max} deal-breakers to continue.")
    } else if count < min {
        format!("Select {} more to continue.", min - count)
    } else {
        format!(
            "{count} selected. You can continue or add {} more.",
            max - count
        )
    }
}

/// Hint shown when a selection beyond the deal-breaker maximum is rejected.
pub fn dealbreakers_max_hint() -> String {
    format!(
        "You can only select up to {} deal-breakers.",
        DEALBREAKER_LIMITS.max.unwrap_or(usize::MAX)
    )
}

/// Screen-reader status line for the deal-breakers step.
pub fn dealbreakers_status(count: usize) -> String {
    let min = DEALBREAKER_LIMITS.min;
    let max = DEALBREAKER_LIMITS.max.unwrap_or(usize::MAX);
    let mut status = if count == 0 {
        "No deal-breakers selected.".to_string()
    } else {
        format!("{count} of {max} selected.")
    };

    if DEALBREAKER_LIMITS.satisfied_by(count) {
        status.push_str(" You can continue to the next step.");
    } else if count < min {
        status.push_str(&format!(" Select {} more to continue.", min - count));
    }
    status
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sub_selections(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(cat, chips)| (cat.to_string(), owned(chips)))
            .collect()
    }

    // -- Steps --

    #[test]
    fn step_as_str_roundtrip() {
        for step in STEPS {
            assert_eq!(OnboardingStep::from_str_db(step.as_str()).unwrap(), *step);
        }
    }

    #[test]
    fn step_from_str_invalid() {
        assert!(OnboardingStep::from_str_db("unknown").is_err());
        assert!(OnboardingStep::from_str_db("").is_err());
        assert!(OnboardingStep::from_str_db("Interests").is_err());
    }

    #[test]
    fn step_positions_are_ordered() {
        for window in STEPS.windows(2) {
            assert!(window[0].position() < window[1].position());
        }
    }

    #[test]
    fn step_next_chains_to_complete() {
        assert_eq!(
            OnboardingStep::Interests.next(),
            Some(OnboardingStep::SubInterests)
        );
        assert_eq!(
            OnboardingStep::SubInterests.next(),
            Some(OnboardingStep::Dealbreakers)
        );
        assert_eq!(
            OnboardingStep::Dealbreakers.next(),
            Some(OnboardingStep::Complete)
        );
        assert_eq!(OnboardingStep::Complete.next(), None);
    }

    #[test]
    fn current_and_earlier_steps_are_accessible() {
        let current = OnboardingStep::Dealbreakers;
        assert!(can_access(current, OnboardingStep::Interests));
        assert!(can_access(current, OnboardingStep::SubInterests));
        assert!(can_access(current, OnboardingStep::Dealbreakers));
    }

    #[test]
    fn later_steps_are_locked() {
        assert!(!can_access(
            OnboardingStep::Interests,
            OnboardingStep::SubInterests
        ));
        assert!(!can_access(
            OnboardingStep::Interests,
            OnboardingStep::Complete
        ));
        assert!(!can_access(
            OnboardingStep::Dealbreakers,
            OnboardingStep::Complete
        ));
    }

    // -- Interests validation --

    #[test]
    fn interests_within_bounds_pass() {
        let picks = owned(&["Music", "Books", "Travel"]);
        assert_eq!(validate_interests(&picks).unwrap().len(), 3);

        let eight: Vec<String> = INTERESTS.iter().take(8).map(|i| i.to_string()).collect();
        assert_eq!(validate_interests(&eight).unwrap().len(), 8);
    }

    #[test]
    fn too_few_interests_fail() {
        assert!(validate_interests(&owned(&["Music", "Books"])).is_err());
        assert!(validate_interests(&[]).is_err());
    }

    #[test]
    fn too_many_interests_fail() {
        let nine: Vec<String> = INTERESTS.iter().take(9).map(|i| i.to_string()).collect();
        assert!(validate_interests(&nine).is_err());
    }

    #[test]
    fn unknown_interest_fails() {
        let picks = owned(&["Music", "Books", "Skydiving"]);
        let err = validate_interests(&picks).unwrap_err();
        assert!(err.to_string().contains("Skydiving"));
    }

    #[test]
    fn duplicate_interests_collapse() {
        // Three entries but only two distinct values: below the minimum.
        let picks = owned(&["Music", "Music", "Books"]);
        assert!(validate_interests(&picks).is_err());

        let picks = owned(&["Music", "Music", "Books", "Travel"]);
        assert_eq!(validate_interests(&picks).unwrap().len(), 3);
    }

    #[test]
    fn interests_come_back_in_catalog_order() {
        let picks = owned(&["Nature", "Food & Dining", "Music"]);
        let cleaned = validate_interests(&picks).unwrap();
        assert_eq!(cleaned, owned(&["Food & Dining", "Music", "Nature"]));
    }

    // -- Sub-interests validation --

    #[test]
    fn sub_interests_all_categories_pass() {
        let sel = sub_selections(&[
            ("food-drink", &["coffee", "street-food"]),
            ("arts-culture", &["museums"]),
        ]);
        let cleaned = validate_sub_interests(&sel).unwrap();
        assert_eq!(cleaned["food-drink"].len(), 2);
        assert_eq!(cleaned["arts-culture"], owned(&["museums"]));
    }

    #[test]
    fn sub_interests_missing_category_fails() {
        let sel = sub_selections(&[("food-drink", &["coffee"])]);
        let err = validate_sub_interests(&sel).unwrap_err();
        assert!(err.to_string().contains("Arts & Culture"));
    }

    #[test]
    fn sub_interests_empty_category_fails() {
        let sel = sub_selections(&[("food-drink", &["coffee"]), ("arts-culture", &[])]);
        assert!(validate_sub_interests(&sel).is_err());
    }

    #[test]
    fn sub_interests_unknown_category_fails() {
        let sel = sub_selections(&[
            ("food-drink", &["coffee"]),
            ("arts-culture", &["museums"]),
            ("outdoors", &["hiking"]),
        ]);
        assert!(validate_sub_interests(&sel).is_err());
    }

    #[test]
    fn sub_interests_blank_chip_fails() {
        let sel = sub_selections(&[("food-drink", &["  "]), ("arts-culture", &["museums"])]);
        assert!(validate_sub_interests(&sel).is_err());
    }

    // -- Deal-breakers validation --

    #[test]
    fn dealbreakers_within_bounds_pass() {
        assert_eq!(
            validate_dealbreakers(&owned(&["trust", "pricing"])).unwrap(),
            owned(&["trust", "pricing"])
        );
        assert!(validate_dealbreakers(&owned(&["trust", "punctuality", "pricing"])).is_ok());
    }

    #[test]
    fn one_dealbreaker_fails() {
        assert!(validate_dealbreakers(&owned(&["trust"])).is_err());
    }

    #[test]
    fn four_dealbreakers_fail() {
        let all: Vec<String> = DEALBREAKERS.iter().map(|(id, _)| id.to_string()).collect();
        assert!(validate_dealbreakers(&all).is_err());
    }

    #[test]
    fn unknown_dealbreaker_fails() {
        assert!(validate_dealbreakers(&owned(&["trust", "weather"])).is_err());
    }

    // -- Completion invariant --

    #[test]
    fn answers_complete_when_all_steps_valid() {
        let interests = owned(&["Music", "Books", "Travel"]);
        let subs = sub_selections(&[("food-drink", &["coffee"]), ("arts-culture", &["museums"])]);
        let dealbreakers = owned(&["trust", "pricing"]);
        assert!(answers_complete(&interests, &subs, &dealbreakers));
    }

    #[test]
    fn answers_incomplete_when_any_step_invalid() {
        let interests = owned(&["Music", "Books", "Travel"]);
        let subs = sub_selections(&[("food-drink", &["coffee"]), ("arts-culture", &["museums"])]);
        assert!(!answers_complete(&interests, &subs, &owned(&["trust"])));
        assert!(!answers_complete(&owned(&["Music"]), &subs, &owned(&["trust", "pricing"])));
        let missing = sub_selections(&[("food-drink", &["coffee"])]);
        assert!(!answers_complete(&interests, &missing, &owned(&["trust", "pricing"])));
    }

    // -- Page copy --

    #[test]
    fn interests_button_counts_down() {
        assert_eq!(interests_button_label(0), "Select 3 more");
        assert_eq!(interests_button_label(2), "Select 1 more");
        assert_eq!(interests_button_label(3), "Next");
        assert_eq!(interests_button_label(8), "Next");
    }

    #[test]
    fn interests_status_pluralizes() {
        assert!(interests_status(1).starts_with("1 interest selected."));
        assert!(interests_status(2).starts_with("2 interests selected."));
        assert!(interests_status(3).ends_with("You can now continue to the next step."));
    }

    #[test]
    fn dealbreakers_hint_progression() {
        assert_eq!(dealbreakers_hint(0), "Select 2\u{2013}3 deal-breakers to continue.");
        assert_eq!(dealbreakers_hint(1), "Select 1 more to continue.");
        assert_eq!(
            dealbreakers_hint(2),
            "2 selected. You can continue or add 1 more."
        );
        assert_eq!(
            dealbreakers_hint(3),
            "3 selected. You can continue or add 0 more."
        );
    }

    #[test]
    fn dealbreakers_status_tracks_validity() {
        assert_eq!(dealbreakers_status(0), "No deal-breakers selected.");
        assert_eq!(
            dealbreakers_status(1),
            "1 of 3 selected. Select 1 more to continue."
        );
        assert_eq!(
            dealbreakers_status(2),
            "2 of 3 selected. You can continue to the next step."
        );
    }

    #[test]
    fn max_feedback_names_the_limit() {
        assert_eq!(interests_max_feedback(), "Maximum of 8 interests can be selected");
        assert_eq!(
            dealbreakers_max_hint(),
            "You can only select up to 3 deal-breakers."
        );
    }
}
