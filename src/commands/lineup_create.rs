//! `lineup-create`: creates an empty lineup under a rule set.

use async_trait::async_trait;
use chrono::Utc;
use lineup_core::{MAX_LENGTH, MIN_LENGTH};
use tracing::{info, instrument, warn};

use crate::LineupRepository;
use crate::commands::{
    CommandDescription, CommandRequest, CommandResponse, OptionDescription, SlashCommand,
};
use crate::format::{colored_block, lineup_text, rule_set_text};
use crate::reveal_at::parse_reveal_at;
use crate::service::ServiceError;

/// Creates a lineup.
#[derive(Debug, Clone)]
pub struct LineupCreateCommand {
    repository: LineupRepository,
}

impl LineupCreateCommand {
    /// Creates the command.
    pub fn new(repository: LineupRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SlashCommand for LineupCreateCommand {
    fn describe(&self) -> CommandDescription {
        CommandDescription::new(
            "lineup-create".to_string(),
            "Create a lineup".to_string(),
            vec![
                OptionDescription::integer("ruleset-id", "Ruleset id", true, 1, i32::MAX.into()),
                OptionDescription::integer(
                    "size",
                    "Number of players",
                    true,
                    MIN_LENGTH.into(),
                    MAX_LENGTH.into(),
                ),
                OptionDescription::string(
                    "reveal-at",
                    "Minutes from now, a unix timestamp, or a duration like 1h20m",
                    true,
                ),
            ],
            true,
        )
    }

    #[instrument(skip_all, fields(user_id = request.user_id()))]
    async fn handle(&self, request: &CommandRequest) -> Result<CommandResponse, ServiceError> {
        let rule_set_id = request.int32("ruleset-id").unwrap_or_default();
        let size = request
            .integer("size")
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default();
        let raw_reveal_at = request.text("reveal-at").unwrap_or_default();

        let reveal_at = match parse_reveal_at(&raw_reveal_at, Utc::now()) {
            Ok(reveal_at) => reveal_at,
            Err(e) => {
                warn!(reason = %e.message, "Invalid reveal time");
                return Ok(CommandResponse::new(
                    "Invalid format: `revealAt` parameter".to_string(),
                    true,
                ));
            }
        };

        let Some(lineup) = self.repository.create_lineup(rule_set_id, size, reveal_at)? else {
            return Ok(CommandResponse::new(
                format!("Ruleset `{}` not found", rule_set_id),
                true,
            ));
        };

        info!(lineup_id = %lineup.id(), "Lineup command handled");
        Ok(CommandResponse::new(
            format!(
                "{}Ruleset: \n{}\nLineup: \n{}",
                colored_block("Lineup created:", true),
                rule_set_text(*lineup.rule_set_id(), lineup.rule_set()),
                lineup_text(&lineup)
            ),
            true,
        ))
    }
}
