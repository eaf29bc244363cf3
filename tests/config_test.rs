//! Tests for configuration loading.

use std::io::Write;

use lineup_bot::{BotConfig, Race, ReportFormatter};
use tempfile::NamedTempFile;

#[test]
fn test_defaults_from_empty_file() {
    let config = BotConfig::from_toml("").expect("Empty config should parse");
    assert_eq!(config, BotConfig::default());
    assert_eq!(config.database_path(), "lineup.db");
    assert_eq!(config.stats().base_url(), "https://www.nephest.com/sc2/api");
    assert_eq!(*config.stats().connect_timeout_secs(), 10);
    assert_eq!(*config.sweep().interval_secs(), 600);
    assert_eq!(config.sweep().grace_period().num_hours(), 24);
    assert_eq!(*config.server().port(), 3000);
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config = BotConfig::from_toml(
        r#"
database_path = "/tmp/bot.db"

[stats]
read_timeout_secs = 3

[race_emojis]
ZERG = "<:zerg:1>"
Terran = "<:terran:2>"
"#,
    )
    .expect("Config should parse");

    assert_eq!(config.database_path(), "/tmp/bot.db");
    assert_eq!(*config.stats().read_timeout_secs(), 3);
    assert_eq!(*config.stats().connect_timeout_secs(), 10);

    let formatter = ReportFormatter::from_config(&config);
    assert_eq!(formatter.race(Race::Zerg), "<:zerg:1>");
    assert_eq!(formatter.race(Race::Terran), "<:terran:2>");
    assert_eq!(formatter.race(Race::Random), "Random");
}

#[test]
fn test_invalid_values_rejected() {
    assert!(BotConfig::from_toml("database_path = 5").is_err());
    assert!(BotConfig::from_toml("[stats]\nprofile_url_template = \"https://x\"").is_err());
    assert!(BotConfig::from_toml("[sweep]\ninterval_secs = 0").is_err());
}

#[test]
fn test_from_file_and_missing_path() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "[server]\nport = 8080").expect("Write failed");

    let config = BotConfig::load(Some(file.path())).expect("Load failed");
    assert_eq!(*config.server().port(), 8080);

    let missing = file.path().with_extension("missing");
    let config = BotConfig::load(Some(missing.as_path())).expect("Missing file should yield defaults");
    assert_eq!(config, BotConfig::default());
}
