//! Lineup services: roster verification, fill, reveal and expiry sweep.

mod fill;
mod reveal;
mod sweep;
mod verification;

pub use fill::{FillOutcome, FillService};
pub use reveal::{RevealOutcome, RevealService};
pub use sweep::LineupSweeper;
pub use verification::{EntryStatus, LadderSnapshot, Verification, VerifiedEntry, Verifier};

use derive_more::{Display, Error, From};

use crate::{DbError, StatsError};

/// Failure that aborts a request. Roster problems and rule violations are
/// outcomes, not errors.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ServiceError {
    /// Storage failed.
    #[display("{_0}")]
    Db(DbError),
    /// The stats provider was unreachable or answered badly.
    #[display("{_0}")]
    Stats(StatsError),
}
