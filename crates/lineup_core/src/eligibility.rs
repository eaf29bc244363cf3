//! Eligibility evaluation of ladder summaries against a rule set.

use derive_more::Display;
use tracing::{debug, instrument};

use crate::{PerformanceSummary, RuleSet};

/// One failed eligibility check, rendered as `"<label>: <value>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Violation {
    /// No ladder activity for the id and race within the depth.
    #[display("player is inactive (no games played)")]
    Inactive,
    /// Too few games played.
    #[display("games: {_0}")]
    Games(i32),
    /// Last rating outside the bounds.
    #[display("mmr: {_0}")]
    Rating(i32),
    /// Average rating outside the bounds.
    #[display("avg mmr: {_0}")]
    AverageRating(i32),
    /// Peak rating outside the bounds.
    #[display("max mmr: {_0}")]
    PeakRating(i32),
}

/// Checks a summary against a rule set.
///
/// An absent summary yields exactly [`Violation::Inactive`]. Otherwise every
/// configured bound is checked in a fixed order (games, last rating max/min,
/// average max/min, peak max/min) and each failure is reported; the checks
/// do not stop at the first failure. An empty result means eligible.
#[instrument(skip_all, fields(depth = rules.depth()))]
pub fn check_eligibility(summary: Option<&PerformanceSummary>, rules: &RuleSet) -> Vec<Violation> {
    let Some(summary) = summary else {
        debug!("No summary, player is inactive");
        return vec![Violation::Inactive];
    };

    let mut violations = Vec::new();
    let games = *summary.games();
    let last = *summary.rating_last();
    let avg = *summary.rating_avg();
    let peak = *summary.rating_max();

    if below(*rules.games_min(), games) {
        violations.push(Violation::Games(games));
    }
    if above(*rules.rating_max(), last) {
        violations.push(Violation::Rating(last));
    }
    if below(*rules.rating_min(), last) {
        violations.push(Violation::Rating(last));
    }
    if above(*rules.rating_avg_max(), avg) {
        violations.push(Violation::AverageRating(avg));
    }
    if below(*rules.rating_avg_min(), avg) {
        violations.push(Violation::AverageRating(avg));
    }
    if above(*rules.rating_max_max(), peak) {
        violations.push(Violation::PeakRating(peak));
    }
    if below(*rules.rating_max_min(), peak) {
        violations.push(Violation::PeakRating(peak));
    }

    debug!(
        character_id = summary.character_id(),
        violations = violations.len(),
        "Summary evaluated"
    );
    violations
}

fn above(bound: Option<i32>, value: i32) -> bool {
    bound.is_some_and(|max| value > max)
}

fn below(bound: Option<i32>, value: i32) -> bool {
    bound.is_some_and(|min| value < min)
}
