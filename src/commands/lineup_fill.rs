//! `lineup-fill`: submits the invoking user's roster.

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::commands::{
    CommandDescription, CommandRequest, CommandResponse, OptionDescription, SlashCommand,
};
use crate::format::ReportFormatter;
use crate::service::{FillService, ServiceError};

/// Fills a lineup with the invoking user's roster. Replies are ephemeral.
#[derive(Debug, Clone)]
pub struct LineupFillCommand {
    service: FillService,
    formatter: ReportFormatter,
}

impl LineupFillCommand {
    /// Creates the command.
    pub fn new(service: FillService, formatter: ReportFormatter) -> Self {
        Self { service, formatter }
    }
}

#[async_trait]
impl SlashCommand for LineupFillCommand {
    fn describe(&self) -> CommandDescription {
        CommandDescription::new(
            "lineup-fill".to_string(),
            "Fill a lineup".to_string(),
            vec![
                OptionDescription::string("id", "Lineup id", true),
                OptionDescription::string(
                    "lineup",
                    "Comma separated players: 1233, 123 zerg, Alice protoss",
                    true,
                ),
            ],
            true,
        )
    }

    #[instrument(skip_all, fields(user_id = request.user_id()))]
    async fn handle(&self, request: &CommandRequest) -> Result<CommandResponse, ServiceError> {
        let id = request.text("id").unwrap_or_default();
        let Ok(lineup_id) = Uuid::parse_str(id.trim()) else {
            return Ok(CommandResponse::new("Invalid id".to_string(), true));
        };
        let roster = request.text("lineup").unwrap_or_default();

        let outcome = self
            .service
            .fill(lineup_id, *request.user_id(), &roster, Utc::now())
            .await?;
        Ok(CommandResponse::new(outcome.render(&self.formatter), true))
    }
}
