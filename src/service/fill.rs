//! Lineup fill: replace one user's roster after verifying it.

use chrono::{DateTime, Utc};
use lineup_core::{Lineup, ParseError, Player, parse_roster};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::format::{ReportFormatter, colored_block, header, user_tag};
use crate::service::{ServiceError, Verification, Verifier};
use crate::{ClearOutcome, LineupRepository};

const REJECTED: &str = "Can't save the lineup due to ruleset violations";

/// Result of a fill request.
#[derive(Debug, Clone)]
pub enum FillOutcome {
    /// No lineup with that id.
    NotFound(Uuid),
    /// The lineup is past its reveal time; nothing changed.
    Revealed(Lineup),
    /// The roster text is malformed.
    ParseFailed {
        /// Target lineup.
        lineup: Lineup,
        /// First failing slot.
        error: ParseError,
    },
    /// The roster has the wrong number of entries.
    LengthMismatch {
        /// Target lineup.
        lineup: Lineup,
        /// Entries the lineup needs.
        required: u32,
        /// Entries submitted.
        received: usize,
    },
    /// The roster was verified; it was saved only when accepted.
    Checked {
        /// Target lineup.
        lineup: Lineup,
        /// Submitting user.
        discord_user_id: i64,
        /// Per-slot results.
        verification: Verification,
    },
}

impl FillOutcome {
    /// Whether the submission was stored.
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Checked { verification, .. } if verification.accepted())
    }

    /// Reply text.
    pub fn render(&self, formatter: &ReportFormatter) -> String {
        match self {
            Self::NotFound(id) => format!("`{}` lineup not found", id),
            Self::Revealed(lineup) => {
                colored_block(
                    "Can't save the lineup because it might already be revealed.",
                    false,
                ) + &header(lineup)
            }
            Self::ParseFailed { error, .. } => {
                colored_block(&format!("Invalid lineup. {}", error), false)
            }
            Self::LengthMismatch {
                required, received, ..
            } => format!(
                "{}**Players required:** {}\n**Players received:** {}\n",
                colored_block(REJECTED, false),
                required,
                received
            ),
            Self::Checked {
                lineup,
                discord_user_id,
                verification,
            } => {
                let accepted = verification.accepted();
                let title = if accepted { "Lineup filled:" } else { REJECTED };
                format!(
                    "{}{}**{} players**\n{}\n",
                    colored_block(title, accepted),
                    header(lineup),
                    user_tag(*discord_user_id),
                    formatter.report(verification)
                )
            }
        }
    }
}

/// Runs the fill pipeline against storage and the stats provider.
#[derive(Debug, Clone)]
pub struct FillService {
    repository: LineupRepository,
    verifier: Verifier,
}

impl FillService {
    /// Creates a fill service.
    #[instrument(skip_all)]
    pub fn new(repository: LineupRepository, verifier: Verifier) -> Self {
        info!("Creating FillService");
        Self {
            repository,
            verifier,
        }
    }

    /// Replaces the roster `discord_user_id` submitted for a lineup.
    ///
    /// The user's previous slots are removed first and stay removed when the
    /// new roster is rejected. Nothing changes once the lineup is revealed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if storage or the stats provider fails; no
    /// new players are saved in that case.
    #[instrument(skip(self, raw, now), fields(len = raw.len()))]
    pub async fn fill(
        &self,
        lineup_id: Uuid,
        discord_user_id: i64,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<FillOutcome, ServiceError> {
        let lineup = match self
            .repository
            .find_and_clear(lineup_id, discord_user_id, now)?
        {
            ClearOutcome::NotFound => return Ok(FillOutcome::NotFound(lineup_id)),
            ClearOutcome::Revealed(lineup) => return Ok(FillOutcome::Revealed(lineup)),
            ClearOutcome::Cleared { lineup, removed } => {
                debug!(removed, "Previous slots removed");
                lineup
            }
        };

        let entries = match parse_roster(raw) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(%error, "Roster rejected");
                return Ok(FillOutcome::ParseFailed { lineup, error });
            }
        };

        let required = *lineup.length();
        if entries.len() != required as usize {
            warn!(required, received = entries.len(), "Roster length mismatch");
            return Ok(FillOutcome::LengthMismatch {
                lineup,
                required,
                received: entries.len(),
            });
        }

        let verification = self.verifier.verify(lineup.rule_set(), &entries).await?;
        if verification.accepted() {
            let players: Vec<Player> = entries
                .into_iter()
                .map(|entry| Player::new(discord_user_id, entry))
                .collect();
            self.repository.save_players(lineup_id, &players)?;
            info!(players = players.len(), "Lineup filled");
        } else {
            info!(
                rejected = verification.rejected_entries().count(),
                "Roster violates rule set"
            );
        }

        Ok(FillOutcome::Checked {
            lineup,
            discord_user_id,
            verification,
        })
    }
}
