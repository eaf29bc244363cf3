//! `ruleset`: creates a rule set.

use async_trait::async_trait;
use lineup_core::{MAX_DEPTH, MIN_DEPTH, RuleSet};
use tracing::{info, instrument, warn};

use crate::LineupRepository;
use crate::commands::{
    CommandDescription, CommandRequest, CommandResponse, OptionDescription, SlashCommand,
};
use crate::format::rule_set_text;
use crate::service::ServiceError;

const MAX_GAMES: i64 = 1000;
const MAX_RATING: i64 = 10_000;

/// Rating bound options in the order they are applied.
const RATING_OPTIONS: [(&str, &str); 6] = [
    ("mmr-min", "Minimum last MMR"),
    ("mmr-max", "Maximum last MMR"),
    ("mmr-avg-min", "Minimum average MMR"),
    ("mmr-avg-max", "Maximum average MMR"),
    ("mmr-max-min", "Minimum peak MMR"),
    ("mmr-max-max", "Maximum peak MMR"),
];

/// Creates a rule set from the supplied bounds.
#[derive(Debug, Clone)]
pub struct RuleSetCommand {
    repository: LineupRepository,
}

impl RuleSetCommand {
    /// Creates the command.
    pub fn new(repository: LineupRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SlashCommand for RuleSetCommand {
    fn describe(&self) -> CommandDescription {
        let mut options = vec![
            OptionDescription::string("name", "Ruleset name", true),
            OptionDescription::integer(
                "depth",
                "Days of ladder history to check",
                true,
                MIN_DEPTH.into(),
                MAX_DEPTH.into(),
            ),
            OptionDescription::integer("games", "Minimum games played", false, 1, MAX_GAMES),
        ];
        options.extend(
            RATING_OPTIONS
                .iter()
                .map(|(name, description)| {
                    OptionDescription::integer(name, description, false, 1, MAX_RATING)
                }),
        );
        CommandDescription::new(
            "ruleset".to_string(),
            "Create a lineup ruleset".to_string(),
            options,
            true,
        )
    }

    #[instrument(skip_all, fields(user_id = request.user_id()))]
    async fn handle(&self, request: &CommandRequest) -> Result<CommandResponse, ServiceError> {
        let name = request.text("name").unwrap_or_default().trim().to_string();
        let depth = request.int32("depth").unwrap_or_default();
        let rules = match RuleSet::new(name, depth) {
            Ok(rules) => rules,
            Err(e) => {
                warn!(reason = %e.message, "Rule set rejected");
                return Ok(CommandResponse::new(e.message, true));
            }
        };
        let rules = rules
            .with_games_min(request.int32("games"))
            .with_rating_min(request.int32("mmr-min"))
            .with_rating_max(request.int32("mmr-max"))
            .with_rating_avg_min(request.int32("mmr-avg-min"))
            .with_rating_avg_max(request.int32("mmr-avg-max"))
            .with_rating_max_min(request.int32("mmr-max-min"))
            .with_rating_max_max(request.int32("mmr-max-max"));

        let stored = self.repository.create_rule_set(&rules)?;
        info!(rule_set_id = stored.id(), "Rule set command handled");
        Ok(CommandResponse::new(
            format!(
                "Created ruleset:\n{}",
                rule_set_text(*stored.id(), stored.rule_set())
            ),
            true,
        ))
    }
}
