//! Lineup Bot library - lineup composition with ladder eligibility checks
//!
//! Users create rule sets and time-locked lineups, then fill them with
//! rosters that are verified against a ranked-ladder stats provider.
//!
//! # Architecture
//!
//! - **Core** (`lineup_core`): rule sets, roster parsing, eligibility, lineups
//! - **Persistence**: SQLite via diesel with embedded migrations
//! - **Stats**: batched lookups against the ladder API
//! - **Services**: fill, reveal and the expiry sweep
//! - **Commands**: routing table of slash commands, served over HTTP
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lineup_bot::{BotConfig, CommandRouter, LineupRepository, PulseClient, ReportFormatter};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = BotConfig::default();
//! let repository = LineupRepository::new(config.database_path().clone())?;
//! repository.run_migrations()?;
//! let stats = Arc::new(PulseClient::new(config.stats())?);
//! let router = CommandRouter::standard(repository, stats, ReportFormatter::from_config(&config));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod commands;
mod config;
mod db;
pub mod format;
mod reveal_at;
mod server;
mod service;
mod stats;

pub use lineup_core::{
    CharacterIdentity, Lineup, MAX_DEPTH, MAX_LENGTH, MIN_DEPTH, MIN_LENGTH, ParseError,
    ParsedEntry, PerformanceSummary, Player, PlayerKey, Race, Region, RuleSet, ValidationError,
    Violation, check_eligibility, parse_entry, parse_roster,
};

pub use commands::{
    CommandDescription, CommandRequest, CommandResponse, CommandRouter, LineupCreateCommand,
    LineupFillCommand, LineupRevealCommand, OptionDescription, OptionKind, OptionValue,
    RuleSetCommand, SlashCommand, UNEXPECTED_ERROR,
};
pub use config::{BotConfig, CONFIG_ENV, ConfigError, ServerConfig, StatsConfig, SweepConfig};
pub use db::{
    ClearOutcome, DbError, LineupRecord, LineupRepository, MIGRATIONS, NewLineup, NewPlayer,
    NewRuleSet, PlayerRecord, RuleSetRecord, StoredRuleSet,
};
pub use format::ReportFormatter;
pub use reveal_at::{MAX_RELATIVE_MINUTES, RevealAtError, parse_reveal_at};
pub use server::app;
pub use service::{
    EntryStatus, FillOutcome, FillService, LadderSnapshot, LineupSweeper, RevealOutcome,
    RevealService, ServiceError, Verification, VerifiedEntry, Verifier,
};
pub use stats::{PulseClient, StatsError, StatsProvider};
