//! Selection counting mechanics.
//!
//! One model backs every pick-from-a-grid surface: interest bubbles,
//! sub-interest chips, deal-breaker cards, and review tags. A
//! [`SelectionSet`] owns the picked ids and enforces its
//! [`SelectionLimits`] on toggle; selecting at the maximum is rejected
//! without mutating the set, deselecting always succeeds.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Inclusive selection bounds. `max = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub min: usize,
    pub max: Option<usize>,
}

impl SelectionLimits {
    pub const fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Whether a selection of `count` items satisfies the bounds.
    pub fn satisfied_by(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Whether `count` items leave no room for another selection.
    pub fn at_max(&self, count: usize) -> bool {
        self.max.is_some_and(|max| count >= max)
    }

    /// How many more selections are needed to reach the minimum.
    pub fn remaining_to_min(&self, count: usize) -> usize {
        self.min.saturating_sub(count)
    }
}

// ---------------------------------------------------------------------------
// Single-pool selections
// ---------------------------------------------------------------------------

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    /// The id was not selected and the set is already at its maximum.
    /// Nothing changed.
    RejectedAtMax,
}

/// A bounded set of selected option ids.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    limits: SelectionLimits,
    selected: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new(limits: SelectionLimits) -> Self {
        Self {
            limits,
            selected: BTreeSet::new(),
        }
    }

    /// Seed a set from saved selections. Items beyond the maximum are
    /// dropped rather than rejected, matching how saved state is restored.
    pub fn with_selected<I, S>(limits: SelectionLimits, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new(limits);
        for id in selected {
            if set.limits.at_max(set.selected.len()) {
                break;
            }
            set.selected.insert(id.into());
        }
        set
    }

    /// Toggle an id. Selecting past the maximum is rejected and the set is
    /// left untouched; deselecting always succeeds.
    pub fn toggle(&mut self, id: &str) -> Toggle {
        if self.selected.remove(id) {
            return Toggle::Deselected;
        }
        if self.limits.at_max(self.selected.len()) {
            return Toggle::RejectedAtMax;
        }
        self.selected.insert(id.to_string());
        Toggle::Selected
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn limits(&self) -> SelectionLimits {
        self.limits
    }

    /// Selected ids in sorted order.
    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Whether the continue control should be enabled.
    pub fn continue_enabled(&self) -> bool {
        self.limits.satisfied_by(self.selected.len())
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

// ---------------------------------------------------------------------------
// Per-category selections
// ---------------------------------------------------------------------------

/// Selections grouped by category, each category requiring a minimum
/// number of picks (the sub-interests step).
#[derive(Debug, Clone)]
pub struct CategorySelections {
    categories: &'static [(&'static str, &'static str)],
    min_per_category: usize,
    selections: BTreeMap<&'static str, BTreeSet<String>>,
}

impl CategorySelections {
    pub fn new(
        categories: &'static [(&'static str, &'static str)],
        min_per_category: usize,
    ) -> Self {
        let selections = categories
            .iter()
            .map(|(id, _)| (*id, BTreeSet::new()))
            .collect();
        Self {
            categories,
            min_per_category,
            selections,
        }
    }

    fn category_key(&self, category: &str) -> Option<&'static str> {
        self.categories
            .iter()
            .find(|(id, _)| *id == category)
            .map(|(id, _)| *id)
    }

    /// Toggle a chip within a category. Categories have no maximum.
    pub fn toggle(&mut self, category: &str, chip: &str) -> Result<Toggle, CoreError> {
        let key = self.category_key(category).ok_or_else(|| {
            CoreError::Validation(format!("Unknown sub-interest category '{category}'"))
        })?;
        let set = self.selections.entry(key).or_default();
        if set.remove(chip) {
            Ok(Toggle::Deselected)
        } else {
            set.insert(chip.to_string());
            Ok(Toggle::Selected)
        }
    }

    /// Restore saved selections, ignoring unknown categories.
    pub fn restore(&mut self, saved: &BTreeMap<String, Vec<String>>) {
        for (category, chips) in saved {
            if let Some(key) = self.category_key(category) {
                let set = self.selections.entry(key).or_default();
                set.extend(chips.iter().cloned());
            }
        }
    }

    pub fn count_in(&self, category: &str) -> usize {
        self.category_key(category)
            .and_then(|key| self.selections.get(key))
            .map_or(0, BTreeSet::len)
    }

    /// Labels of categories still below the minimum, in display order.
    pub fn missing_labels(&self) -> Vec<&'static str> {
        self.categories
            .iter()
            .filter(|(id, _)| self.count_in(id) < self.min_per_category)
            .map(|(_, label)| *label)
            .collect()
    }

    /// Whether every category meets its minimum.
    pub fn continue_enabled(&self) -> bool {
        self.missing_labels().is_empty()
    }

    /// Screen-reader status line: per-category counts, then either the
    /// all-complete confirmation or the categories still needed.
    pub fn status_message(&self) -> String {
        let mut parts = Vec::new();
        for (id, label) in self.categories {
            let count = self.count_in(id);
            if count > 0 {
                parts.push(format!("{count} selected in {label}"));
            }
        }

        let mut status = String::new();
        if !parts.is_empty() {
            status.push_str(&parts.join(", "));
            status.push_str(". ");
        }

        let missing = self.missing_labels();
        if missing.is_empty() {
            status.push_str("All categories complete. You can continue.");
        } else {
            status.push_str(&format!(
                "Please select at least one option in: {}.",
                missing.join(", ")
            ));
        }
        status
    }

    /// Current selections keyed by category id, for persistence.
    pub fn selections(&self) -> BTreeMap<String, Vec<String>> {
        self.selections
            .iter()
            .map(|(id, set)| (id.to_string(), set.iter().cloned().collect()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
