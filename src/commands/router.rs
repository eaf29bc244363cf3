//! Routing table from command name to handler.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::commands::{
    CommandDescription, CommandRequest, CommandResponse, LineupCreateCommand, LineupFillCommand,
    LineupRevealCommand, RuleSetCommand, SlashCommand,
};
use crate::format::ReportFormatter;
use crate::service::{FillService, RevealService, Verifier};
use crate::{LineupRepository, StatsProvider};

/// Reply sent when storage or the stats provider fails.
pub const UNEXPECTED_ERROR: &str = "An unexpected error has occurred. Please try again later.";

/// Immutable mapping from command name to handler, built once at startup.
#[derive(Clone, Default)]
pub struct CommandRouter {
    commands: BTreeMap<String, Arc<dyn SlashCommand>>,
}

impl std::fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRouter")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandRouter {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command under its described name, replacing any previous one.
    pub fn with_command(mut self, command: impl SlashCommand + 'static) -> Self {
        let name = command.describe().name().clone();
        debug!(command = %name, "Registering command");
        self.commands.insert(name, Arc::new(command));
        self
    }

    /// Router with the ruleset, lineup-create, lineup-fill and lineup-reveal commands.
    #[instrument(skip_all)]
    pub fn standard(
        repository: LineupRepository,
        stats: Arc<dyn StatsProvider>,
        formatter: ReportFormatter,
    ) -> Self {
        let verifier = Verifier::new(stats);
        let router = Self::new()
            .with_command(RuleSetCommand::new(repository.clone()))
            .with_command(LineupCreateCommand::new(repository.clone()))
            .with_command(LineupFillCommand::new(
                FillService::new(repository.clone(), verifier.clone()),
                formatter.clone(),
            ))
            .with_command(LineupRevealCommand::new(
                RevealService::new(repository, verifier),
                formatter,
            ));
        info!(commands = router.commands.len(), "Command router built");
        router
    }

    /// Registered command names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Schemas of every registered command.
    pub fn descriptions(&self) -> Vec<CommandDescription> {
        self.commands.values().map(|c| c.describe()).collect()
    }

    /// Dispatches a request and always produces a reply.
    ///
    /// Unknown commands and invalid options are answered directly. Service
    /// failures are logged and answered with [`UNEXPECTED_ERROR`].
    #[instrument(skip(self, request), fields(user_id = request.user_id()))]
    pub async fn dispatch(&self, name: &str, request: &CommandRequest) -> CommandResponse {
        let Some(command) = self.commands.get(name) else {
            warn!("Unknown command");
            return CommandResponse::new("Unknown command".to_string(), true);
        };

        let description = command.describe();
        if let Err(message) = description.check(request) {
            debug!(reason = %message, "Invalid options");
            return CommandResponse::new(message, *description.ephemeral());
        }

        match command.handle(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Command failed");
                CommandResponse::new(UNEXPECTED_ERROR.to_string(), true)
            }
        }
    }
}
