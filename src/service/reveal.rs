//! Lineup reveal: read-only display of every submitted roster.

use chrono::{DateTime, Utc};
use lineup_core::{Lineup, ParsedEntry};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::LineupRepository;
use crate::format::{ReportFormatter, format_time, header, user_tag};
use crate::service::{ServiceError, Verification, Verifier};

/// Result of a reveal request.
#[derive(Debug, Clone)]
pub enum RevealOutcome {
    /// No lineup with that id.
    NotFound(Uuid),
    /// Still before the reveal time; only the submitter count is shown.
    Hidden(Lineup),
    /// Every user's roster, re-verified, users ascending.
    Revealed {
        /// Revealed lineup.
        lineup: Lineup,
        /// One verification per submitting user.
        sections: Vec<(i64, Verification)>,
    },
}

impl RevealOutcome {
    /// Reply text.
    pub fn render(&self, formatter: &ReportFormatter) -> String {
        match self {
            Self::NotFound(id) => format!("`{}` lineup not found", id),
            Self::Hidden(lineup) => format!(
                "{}Players can be revealed after {}\nLineup count: {}\n",
                header(lineup),
                format_time(*lineup.reveal_at()),
                lineup.submitted_users()
            ),
            Self::Revealed { lineup, sections } => {
                let sections: Vec<String> = sections
                    .iter()
                    .map(|(user, verification)| {
                        format!(
                            "**{} players**\n{}\n",
                            user_tag(*user),
                            formatter.report(verification)
                        )
                    })
                    .collect();
                header(lineup) + &sections.join("\n")
            }
        }
    }
}

/// Reveals lineups once their reveal time has passed.
#[derive(Debug, Clone)]
pub struct RevealService {
    repository: LineupRepository,
    verifier: Verifier,
}

impl RevealService {
    /// Creates a reveal service.
    #[instrument(skip_all)]
    pub fn new(repository: LineupRepository, verifier: Verifier) -> Self {
        info!("Creating RevealService");
        Self {
            repository,
            verifier,
        }
    }

    /// Loads a lineup and, from its reveal time on, verifies every roster
    /// with fresh ladder data in one batch.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if storage or the stats provider fails.
    #[instrument(skip(self, now))]
    pub async fn reveal(
        &self,
        lineup_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RevealOutcome, ServiceError> {
        let Some(lineup) = self.repository.find_lineup(lineup_id)? else {
            return Ok(RevealOutcome::NotFound(lineup_id));
        };
        if !lineup.is_revealed_at(now) {
            debug!(users = lineup.submitted_users(), "Lineup still hidden");
            return Ok(RevealOutcome::Hidden(lineup));
        }

        let ids = Verifier::reference_ids(lineup.players().map(|p| p.entry()));
        let snapshot = self.verifier.snapshot(*lineup.rule_set().depth(), &ids).await?;

        let sections = lineup
            .players_by_user()
            .into_iter()
            .map(|(user, players)| {
                let entries: Vec<ParsedEntry> =
                    players.into_iter().map(|p| p.entry().clone()).collect();
                (user, snapshot.verify(lineup.rule_set(), &entries))
            })
            .collect::<Vec<_>>();

        info!(users = sections.len(), "Lineup revealed");
        Ok(RevealOutcome::Revealed { lineup, sections })
    }
}
