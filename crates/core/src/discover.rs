//! Discover sections, filters, and paging rules.
//!
//! Discovery is browsed one section at a time. Results are filtered,
//! sorted, and paged in fixed windows; a page that comes back full means
//! more may follow.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Results per page.
pub const PAGE_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The browsable discover sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    ForYou,
    Trending,
    Nearby,
    Featured,
}

/// All sections.
pub const SECTIONS: &[Section] = &[
    Section::ForYou,
    Section::Trending,
    Section::Nearby,
    Section::Featured,
];

impl Section {
    /// Parse a section from a route path segment.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "for-you" => Ok(Self::ForYou),
            "trending" => Ok(Self::Trending),
            "nearby" => Ok(Self::Nearby),
            "featured" => Ok(Self::Featured),
            _ => Err(CoreError::Validation(format!(
                "Invalid discover section '{s}'. Must be one of: for-you, trending, nearby, featured"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForYou => "for-you",
            Self::Trending => "trending",
            Self::Nearby => "nearby",
            Self::Featured => "featured",
        }
    }

    /// Section heading.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ForYou => "For You",
            Self::Trending => "Trending",
            Self::Nearby => "Nearby",
            Self::Featured => "Featured",
        }
    }

    /// Section subheading.
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::ForYou => "Personalized picks based on your interests",
            Self::Trending => "Popular places everyone is talking about",
            Self::Nearby => "Great places within your area",
            Self::Featured => "Handpicked recommendations from our team",
        }
    }
}

// ---------------------------------------------------------------------------
// Price tiers
// ---------------------------------------------------------------------------

/// Price tiers, cheapest to priciest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Budget,
    Moderate,
    Expensive,
    Luxury,
}

impl PriceTier {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "budget" => Ok(Self::Budget),
            "moderate" => Ok(Self::Moderate),
            "expensive" => Ok(Self::Expensive),
            "luxury" => Ok(Self::Luxury),
            _ => Err(CoreError::Validation(format!(
                "Invalid price tier '{s}'. Must be one of: budget, moderate, expensive, luxury"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Moderate => "moderate",
            Self::Expensive => "expensive",
            Self::Luxury => "luxury",
        }
    }

    /// Dollar-sign display, `$` through `$$$$`.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Expensive => "$$$",
            Self::Luxury => "$$$$",
        }
    }
}

// ---------------------------------------------------------------------------
// Sort orders
// ---------------------------------------------------------------------------

/// Result orderings. `Relevance` is the section's native ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Relevance,
    Rating,
    Distance,
    Newest,
}

impl Sort {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "relevance" => Ok(Self::Relevance),
            "rating" => Ok(Self::Rating),
            "distance" => Ok(Self::Distance),
            "newest" => Ok(Self::Newest),
            _ => Err(CoreError::Validation(format!(
                "Invalid sort '{s}'. Must be one of: relevance, rating, distance, newest"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Rating => "rating",
            Self::Distance => "distance",
            Self::Newest => "newest",
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Optional result filters, all off by default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub category: Option<String>,
    pub price: Option<PriceTier>,
    pub min_rating: Option<f64>,
    pub max_distance_km: Option<f64>,
    pub open_now: bool,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        *self == Filters::default()
    }
}

/// Validate a minimum-rating filter value.
pub fn validate_min_rating(rating: f64) -> Result<(), CoreError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating filter must be between 0 and 5 (got {rating})"
        )));
    }
    Ok(())
}

/// Validate a maximum-distance filter value in kilometres.
pub fn validate_max_distance(km: f64) -> Result<(), CoreError> {
    if !km.is_finite() || km <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Distance filter must be a positive number of kilometres (got {km})"
        )));
    }
    Ok(())
}

/// Whether a page of `result_count` items may be followed by another.
pub fn has_more(result_count: usize) -> bool {
    result_count == PAGE_SIZE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
