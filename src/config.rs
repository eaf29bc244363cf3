//! Bot configuration loaded from TOML.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use derive_getters::Getters;
use derive_more::{Display, Error};
use lineup_core::Race;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV: &str = "LINEUP_CONFIG";

/// Top-level bot configuration.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct BotConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Ranked-ladder stats provider.
    #[serde(default)]
    stats: StatsConfig,

    /// Expired lineup sweep.
    #[serde(default)]
    sweep: SweepConfig,

    /// HTTP transport.
    #[serde(default)]
    server: ServerConfig,

    /// Emoji markup per race, e.g. `ZERG = "<:zerg:123>"`. Races without an
    /// entry are rendered by name.
    #[serde(default)]
    race_emojis: BTreeMap<Race, String>,
}

/// Stats provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct StatsConfig {
    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Character profile link; `{id}` is replaced by the character id.
    #[serde(default = "default_profile_url_template")]
    profile_url_template: String,

    #[serde(default = "default_timeout_secs")]
    connect_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    read_timeout_secs: u64,
}

impl StatsConfig {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read timeout as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile_url_template: default_profile_url_template(),
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Sweep settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Seconds between passes.
    #[serde(default = "default_sweep_interval_secs")]
    interval_secs: u64,

    /// Hours a lineup is kept after its reveal time.
    #[serde(default = "default_grace_period_hours")]
    grace_period_hours: i64,
}

impl SweepConfig {
    /// Pass interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Grace period as a [`TimeDelta`].
    pub fn grace_period(&self) -> TimeDelta {
        TimeDelta::hours(self.grace_period_hours)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval_secs(),
            grace_period_hours: default_grace_period_hours(),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,

    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_database_path() -> String {
    "lineup.db".to_string()
}

fn default_base_url() -> String {
    "https://www.nephest.com/sc2/api".to_string()
}

fn default_profile_url_template() -> String {
    "https://www.nephest.com/sc2/?type=character&id={id}&m=1#player-stats-mmr".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_sweep_interval_secs() -> u64 {
    600
}

fn default_grace_period_hours() -> i64 {
    24
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            stats: StatsConfig::default(),
            sweep: SweepConfig::default(),
            server: ServerConfig::default(),
            race_emojis: BTreeMap::new(),
        }
    }
}

impl BotConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content), fields(len = content.len()))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(database = %config.database_path, "Config loaded successfully");
        Ok(config)
    }

    /// Resolves the config path from the argument or [`CONFIG_ENV`] and loads it.
    ///
    /// A path that does not exist yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match std::env::var(CONFIG_ENV) {
                Ok(value) => value.into(),
                Err(_) => {
                    info!("No config path given, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::new("database_path must not be empty"));
        }
        if !self.stats.profile_url_template.contains("{id}") {
            return Err(ConfigError::new(
                "stats.profile_url_template must contain {id}",
            ));
        }
        if self.sweep.interval_secs == 0 {
            return Err(ConfigError::new("sweep.interval_secs must be positive"));
        }
        if self.sweep.grace_period_hours < 0 {
            return Err(ConfigError::new(
                "sweep.grace_period_hours must not be negative",
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
