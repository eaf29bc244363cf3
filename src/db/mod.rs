//! Database persistence layer for rule sets, lineups and their players.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{
    LineupRecord, NewLineup, NewPlayer, NewRuleSet, PlayerRecord, RuleSetRecord, StoredRuleSet,
};
pub use repository::{ClearOutcome, LineupRepository, MIGRATIONS};
