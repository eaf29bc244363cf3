//! Lineup Bot - Unified CLI
//!
//! Serves lineup commands over HTTP, or runs one command, sweep or migration.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use lineup_bot::{
    BotConfig, CommandRequest, CommandRouter, LineupRepository, LineupSweeper, OptionValue,
    PulseClient, ReportFormatter,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lineup_bot=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = BotConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { port, host } => run_server(config, host, port).await,
        Command::Command {
            name,
            user,
            options,
        } => run_command(config, name, user, options).await,
        Command::Sweep => run_sweep(config),
        Command::Migrate => run_migrate(config),
    }
}

/// Opens the repository and applies pending migrations.
fn open_repository(config: &BotConfig) -> Result<LineupRepository> {
    let repository = LineupRepository::new(config.database_path().clone())?;
    repository.run_migrations()?;
    Ok(repository)
}

fn build_router(config: &BotConfig, repository: LineupRepository) -> Result<CommandRouter> {
    let stats = Arc::new(PulseClient::new(config.stats())?);
    Ok(CommandRouter::standard(
        repository,
        stats,
        ReportFormatter::from_config(config),
    ))
}

/// Serve the command router over HTTP with the sweep running alongside
#[instrument(skip(config))]
async fn run_server(config: BotConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let repository = open_repository(&config)?;
    let router = Arc::new(build_router(&config, repository.clone())?);

    let sweeper = LineupSweeper::new(repository, config.sweep().grace_period());
    tokio::spawn(sweeper.run(config.sweep().interval()));

    let host = host.unwrap_or_else(|| config.server().host().clone());
    let port = port.unwrap_or(*config.server().port());
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);

    axum::serve(listener, lineup_bot::app(router)).await?;
    Ok(())
}

/// Dispatch a single command and print the reply
#[instrument(skip(config, options))]
async fn run_command(
    config: BotConfig,
    name: String,
    user: i64,
    options: Vec<(String, String)>,
) -> Result<()> {
    let repository = open_repository(&config)?;
    let router = build_router(&config, repository)?;

    let request = options
        .iter()
        .fold(CommandRequest::new(user, Default::default()), |request, (key, value)| {
            request.with_option(key.clone(), OptionValue::from(value.as_str()))
        });
    let response = router.dispatch(&name, &request).await;
    println!("{}", response.content());
    Ok(())
}

/// Run one sweep pass
fn run_sweep(config: BotConfig) -> Result<()> {
    let repository = open_repository(&config)?;
    let sweeper = LineupSweeper::new(repository, config.sweep().grace_period());
    let removed = sweeper.sweep_once(Utc::now())?;
    info!(removed, "Sweep finished");
    Ok(())
}

/// Apply migrations
fn run_migrate(config: BotConfig) -> Result<()> {
    let repository = LineupRepository::new(config.database_path().clone())?;
    let applied = repository.run_migrations()?;
    info!(applied, "Database ready");
    Ok(())
}
