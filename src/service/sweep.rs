//! Periodic removal of lineups long past their reveal time.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error, info, instrument};

use crate::{DbError, LineupRepository};

/// Deletes lineups whose reveal time is older than the grace period.
#[derive(Debug, Clone)]
pub struct LineupSweeper {
    repository: LineupRepository,
    grace_period: TimeDelta,
}

impl LineupSweeper {
    /// Creates a sweeper.
    pub fn new(repository: LineupRepository, grace_period: TimeDelta) -> Self {
        Self {
            repository,
            grace_period,
        }
    }

    /// Runs one pass, returning the number of lineups removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the delete fails.
    #[instrument(skip(self))]
    pub fn sweep_once(&self, now: DateTime<Utc>) -> Result<usize, DbError> {
        let removed = self
            .repository
            .remove_revealed_before(now - self.grace_period)?;
        if removed > 0 {
            info!("Removed {} old lineups", removed);
        } else {
            debug!("No old lineups");
        }
        Ok(removed)
    }

    /// Sweeps every `interval` until the task is dropped. A failed pass is
    /// logged and the next one runs on schedule.
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep_once(Utc::now()) {
                error!(error = %e, "Sweep failed");
            }
        }
    }
}
