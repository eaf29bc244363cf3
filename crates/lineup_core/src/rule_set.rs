//! Eligibility rule sets.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{PerformanceSummary, ValidationError, Violation, check_eligibility};

/// Longest accepted rule set name, in characters.
pub const MAX_NAME_LENGTH: usize = 150;
/// Shortest lookup depth, in days.
pub const MIN_DEPTH: i32 = 1;
/// Longest lookup depth, in days.
pub const MAX_DEPTH: i32 = 120;

/// Named bundle of eligibility bounds.
///
/// `depth` is always set. Every other bound is optional and `None` means
/// unconstrained. Bounds are inclusive: a value equal to a bound passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct RuleSet {
    #[setters(skip)]
    name: String,
    /// Lookback window in days.
    #[setters(skip)]
    depth: i32,
    /// Minimum games played.
    games_min: Option<i32>,
    /// Minimum last rating.
    rating_min: Option<i32>,
    /// Maximum last rating.
    rating_max: Option<i32>,
    /// Minimum average rating.
    rating_avg_min: Option<i32>,
    /// Maximum average rating.
    rating_avg_max: Option<i32>,
    /// Minimum peak rating.
    rating_max_min: Option<i32>,
    /// Maximum peak rating.
    rating_max_max: Option<i32>,
}

impl RuleSet {
    /// Creates an unconstrained rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the name is empty or longer than
    /// [`MAX_NAME_LENGTH`], or the depth is outside `MIN_DEPTH..=MAX_DEPTH`.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>, depth: i32) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::new("Ruleset name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::new(format!(
                "Ruleset name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(ValidationError::new(format!(
                "Depth must be between {} and {} days",
                MIN_DEPTH, MAX_DEPTH
            )));
        }
        Ok(Self {
            name,
            depth,
            games_min: None,
            rating_min: None,
            rating_max: None,
            rating_avg_min: None,
            rating_avg_max: None,
            rating_max_min: None,
            rating_max_max: None,
        })
    }

    /// Evaluates a summary against this rule set.
    ///
    /// See [`check_eligibility`].
    pub fn evaluate(&self, summary: Option<&PerformanceSummary>) -> Vec<Violation> {
        check_eligibility(summary, self)
    }
}
