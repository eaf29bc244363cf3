//! Command-line interface for lineup_bot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lineup Bot - lineup composition with ladder eligibility checks
#[derive(Parser, Debug)]
#[command(name = "lineup_bot")]
#[command(about = "Lineup composition bot with ranked-ladder verification", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (falls back to LINEUP_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the command router over HTTP and sweep expired lineups
    Serve {
        /// Port to bind to (overrides the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Dispatch one command and print the reply
    Command {
        /// Command name, e.g. lineup-fill
        name: String,

        /// Invoking user id
        #[arg(short, long)]
        user: i64,

        /// Command option as key=value, repeatable
        #[arg(short, long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },

    /// Run one pass of the expired lineup sweep
    Sweep,

    /// Apply database migrations
    Migrate,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty option name in '{}'", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
