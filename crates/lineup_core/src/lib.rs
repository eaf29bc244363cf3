//! Lineup core - pure domain logic for lineup rosters.
//!
//! Nothing in this crate performs I/O. It covers:
//!
//! - **Races and regions** of the ranked ladder
//! - **Rule sets**: eligibility bounds and their evaluation
//! - **Roster parsing**: comma-separated submissions into slot entries
//! - **Lineups**: the slot aggregate with its reveal gate

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod eligibility;
mod entry;
mod error;
mod lineup;
mod race;
mod rule_set;
mod summary;

pub use eligibility::{Violation, check_eligibility};
pub use entry::{ParseError, ParsedEntry, parse_entry, parse_roster};
pub use error::ValidationError;
pub use lineup::{Lineup, MAX_LENGTH, MIN_LENGTH, Player, PlayerKey};
pub use race::{Race, Region};
pub use rule_set::{MAX_DEPTH, MAX_NAME_LENGTH, MIN_DEPTH, RuleSet};
pub use summary::{CharacterIdentity, PerformanceSummary};
