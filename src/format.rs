//! Chat markup for rule sets, lineups and verification reports.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use lineup_core::{Lineup, Race, Region, RuleSet};
use tracing::instrument;

use crate::BotConfig;
use crate::service::{EntryStatus, Verification, VerifiedEntry};

/// Wraps `text` in a diff block, green when `positive`, red otherwise.
pub fn colored_block(text: &str, positive: bool) -> String {
    let sign = if positive { '+' } else { '-' };
    format!("```diff\n{}{}\n```\n", sign, text)
}

/// Mention markup for a chat user.
pub fn user_tag(discord_user_id: i64) -> String {
    format!("<@{}>", discord_user_id)
}

/// RFC 3339 UTC timestamp with second precision.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Glyph for an entry status.
pub fn status_glyph(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Success => ":white_check_mark:",
        EntryStatus::Error => ":x:",
        EntryStatus::Unknown => ":grey_question:",
    }
}

/// Flag for a ladder region.
pub fn region_flag(region: Region) -> &'static str {
    match region {
        Region::Us => "\u{1F1FA}\u{1F1F8}",
        Region::Eu => "\u{1F1EA}\u{1F1FA}",
        Region::Kr => "\u{1F1F0}\u{1F1F7}",
        Region::Cn => "\u{1F1E8}\u{1F1F3}",
    }
}

/// Rule set description with only the configured bounds listed.
pub fn rule_set_text(id: i32, rules: &RuleSet) -> String {
    let mut text = format!(
        "**{}** ruleset\n**Id:** `{}`\n**Depth:** {}\n",
        rules.name(),
        id,
        rules.depth()
    );
    let bounds = [
        ("Games", rules.games_min()),
        ("MMR min", rules.rating_min()),
        ("MMR max", rules.rating_max()),
        ("MMR avg min", rules.rating_avg_min()),
        ("MMR avg max", rules.rating_avg_max()),
        ("MMR max min", rules.rating_max_min()),
        ("MMR max max", rules.rating_max_max()),
    ];
    for (label, bound) in bounds {
        if let Some(value) = bound {
            text.push_str(&format!("**{}:** {}\n", label, value));
        }
    }
    text
}

/// Lineup description.
pub fn lineup_text(lineup: &Lineup) -> String {
    format!(
        "**Id:** `{}`\n**Ruleset:** `{}`\n**Size:** {}\n**Reveal at:** {}",
        lineup.id(),
        lineup.rule_set_id(),
        lineup.length(),
        format_time(*lineup.reveal_at())
    )
}

/// Rule set and lineup header shared by fill and reveal replies.
pub fn header(lineup: &Lineup) -> String {
    format!(
        "**Ruleset**\n{}\n\n**Lineup**\n{}\n\n",
        rule_set_text(*lineup.rule_set_id(), lineup.rule_set()),
        lineup_text(lineup)
    )
}

/// Renders verification reports with configured race emoji and profile links.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    race_emojis: BTreeMap<Race, String>,
    profile_url_template: String,
}

impl ReportFormatter {
    /// Creates a formatter.
    pub fn new(race_emojis: BTreeMap<Race, String>, profile_url_template: String) -> Self {
        Self {
            race_emojis,
            profile_url_template,
        }
    }

    /// Creates a formatter from the bot configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.race_emojis().clone(),
            config.stats().profile_url_template().clone(),
        )
    }

    /// Configured emoji for `race`, or its name.
    pub fn race(&self, race: Race) -> &str {
        self.race_emojis
            .get(&race)
            .map(String::as_str)
            .unwrap_or_else(|| race.name())
    }

    /// Profile link of a character.
    pub fn profile_link(&self, character_id: i64) -> String {
        self.profile_url_template
            .replace("{id}", &character_id.to_string())
    }

    /// One report line:
    /// status, slot, region flag when resolved, race, name or label, violations.
    pub fn entry_line(&self, verified: &VerifiedEntry) -> String {
        let entry = verified.entry();
        let mut line = format!("{} `{}`", status_glyph(*verified.status()), entry.slot());

        let name = match verified.character() {
            Some(character) => {
                line.push(' ');
                line.push_str(region_flag(*character.region()));
                format!(
                    "[**{}**](<{}>)",
                    character.display_name(),
                    self.profile_link(*character.id())
                )
            }
            None => entry.data().clone(),
        };
        line.push(' ');
        line.push_str(self.race(*entry.race()));
        line.push(' ');
        line.push_str(&name);

        if !verified.violations().is_empty() {
            let violations: Vec<String> = verified
                .violations()
                .iter()
                .map(ToString::to_string)
                .collect();
            line.push(' ');
            line.push_str(&violations.join(","));
        }
        line
    }

    /// All entry lines in slot order, newline separated.
    #[instrument(skip_all, fields(entries = verification.entries().len()))]
    pub fn report(&self, verification: &Verification) -> String {
        verification
            .entries()
            .iter()
            .map(|entry| self.entry_line(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
