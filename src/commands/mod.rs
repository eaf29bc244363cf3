//! Slash commands and the routing table that dispatches them.

mod lineup_create;
mod lineup_fill;
mod lineup_reveal;
mod request;
mod router;
mod ruleset;

pub use lineup_create::LineupCreateCommand;
pub use lineup_fill::LineupFillCommand;
pub use lineup_reveal::LineupRevealCommand;
pub use request::{
    CommandDescription, CommandRequest, CommandResponse, OptionDescription, OptionKind, OptionValue,
};
pub use router::{CommandRouter, UNEXPECTED_ERROR};
pub use ruleset::RuleSetCommand;

use async_trait::async_trait;

use crate::service::ServiceError;

/// A command the router can dispatch.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Name, options and visibility of the command.
    fn describe(&self) -> CommandDescription;

    /// Handles a request whose options already match [`Self::describe`].
    ///
    /// User mistakes are answered in the response; only failures of storage
    /// or the stats provider are errors.
    async fn handle(&self, request: &CommandRequest) -> Result<CommandResponse, ServiceError>;
}
