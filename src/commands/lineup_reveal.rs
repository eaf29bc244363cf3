//! `lineup-reveal`: shows a lineup's rosters.

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::commands::{
    CommandDescription, CommandRequest, CommandResponse, OptionDescription, SlashCommand,
};
use crate::format::ReportFormatter;
use crate::service::{RevealService, ServiceError};

/// Reveals a lineup publicly.
#[derive(Debug, Clone)]
pub struct LineupRevealCommand {
    service: RevealService,
    formatter: ReportFormatter,
}

impl LineupRevealCommand {
    /// Creates the command.
    pub fn new(service: RevealService, formatter: ReportFormatter) -> Self {
        Self { service, formatter }
    }
}

#[async_trait]
impl SlashCommand for LineupRevealCommand {
    fn describe(&self) -> CommandDescription {
        CommandDescription::new(
            "lineup-reveal".to_string(),
            "Reveal a lineup".to_string(),
            vec![OptionDescription::string("id", "Lineup id", true)],
            false,
        )
    }

    #[instrument(skip_all, fields(user_id = request.user_id()))]
    async fn handle(&self, request: &CommandRequest) -> Result<CommandResponse, ServiceError> {
        let id = request.text("id").unwrap_or_default();
        let Ok(lineup_id) = Uuid::parse_str(id.trim()) else {
            return Ok(CommandResponse::new("Invalid id".to_string(), true));
        };

        let outcome = self.service.reveal(lineup_id, Utc::now()).await?;
        Ok(CommandResponse::new(outcome.render(&self.formatter), false))
    }
}
