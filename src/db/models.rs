//! Database models and their mapping onto domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use lineup_core::{ParsedEntry, Player, Race, RuleSet};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{DbError, schema};

/// Rule set row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::rule_sets)]
pub struct RuleSetRecord {
    id: i32,
    name: String,
    depth: i32,
    games_min: Option<i32>,
    rating_min: Option<i32>,
    rating_max: Option<i32>,
    rating_avg_min: Option<i32>,
    rating_avg_max: Option<i32>,
    rating_max_min: Option<i32>,
    rating_max_max: Option<i32>,
}

impl RuleSetRecord {
    /// Rebuilds the domain rule set, re-checking name and depth.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored row no longer passes validation.
    #[instrument(skip(self), fields(rule_set_id = self.id))]
    pub fn to_stored(&self) -> Result<StoredRuleSet, DbError> {
        let rule_set = RuleSet::new(self.name.clone(), self.depth)?
            .with_games_min(self.games_min)
            .with_rating_min(self.rating_min)
            .with_rating_max(self.rating_max)
            .with_rating_avg_min(self.rating_avg_min)
            .with_rating_avg_max(self.rating_avg_max)
            .with_rating_max_min(self.rating_max_min)
            .with_rating_max_max(self.rating_max_max);
        Ok(StoredRuleSet::new(self.id, rule_set))
    }
}

/// Insertable rule set.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::rule_sets)]
pub struct NewRuleSet {
    name: String,
    depth: i32,
    games_min: Option<i32>,
    rating_min: Option<i32>,
    rating_max: Option<i32>,
    rating_avg_min: Option<i32>,
    rating_avg_max: Option<i32>,
    rating_max_min: Option<i32>,
    rating_max_max: Option<i32>,
}

impl From<&RuleSet> for NewRuleSet {
    fn from(rule_set: &RuleSet) -> Self {
        Self {
            name: rule_set.name().clone(),
            depth: *rule_set.depth(),
            games_min: *rule_set.games_min(),
            rating_min: *rule_set.rating_min(),
            rating_max: *rule_set.rating_max(),
            rating_avg_min: *rule_set.rating_avg_min(),
            rating_avg_max: *rule_set.rating_avg_max(),
            rating_max_min: *rule_set.rating_max_min(),
            rating_max_max: *rule_set.rating_max_max(),
        }
    }
}

/// A persisted rule set together with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct StoredRuleSet {
    id: i32,
    rule_set: RuleSet,
}

/// Lineup row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::lineups)]
pub struct LineupRecord {
    id: String,
    rule_set_id: i32,
    length: i32,
    reveal_at: NaiveDateTime,
}

impl LineupRecord {
    /// Parses the stored text id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column does not hold a UUID.
    #[instrument(skip(self), fields(id = %self.id))]
    pub fn uuid(&self) -> Result<Uuid, DbError> {
        Uuid::parse_str(&self.id)
            .map_err(|e| DbError::new(format!("Invalid lineup id '{}': {}", self.id, e)))
    }
}

/// Insertable lineup.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::lineups)]
pub struct NewLineup {
    id: String,
    rule_set_id: i32,
    length: i32,
    reveal_at: NaiveDateTime,
}

/// Player row.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::players)]
#[diesel(belongs_to(LineupRecord, foreign_key = lineup_id))]
pub struct PlayerRecord {
    id: i32,
    lineup_id: String,
    discord_user_id: i64,
    slot: i32,
    race: i32,
    data: String,
}

impl PlayerRecord {
    /// Converts the row into a domain player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] for an unknown race code or a negative slot.
    #[instrument(skip(self), fields(player_id = self.id))]
    pub fn to_player(&self) -> Result<Player, DbError> {
        let race = Race::from_id(self.race)
            .ok_or_else(|| DbError::new(format!("Invalid race code: {}", self.race)))?;
        let slot = u32::try_from(self.slot)
            .map_err(|_| DbError::new(format!("Invalid slot: {}", self.slot)))?;
        Ok(Player::new(
            self.discord_user_id,
            ParsedEntry::new(slot, race, self.data.clone()),
        ))
    }
}

/// Insertable player.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    lineup_id: String,
    discord_user_id: i64,
    slot: i32,
    race: i32,
    data: String,
}

impl NewPlayer {
    /// Builds the row for a player of the given lineup.
    #[instrument(skip(player), fields(slot = player.slot()))]
    pub fn from_player(lineup_id: Uuid, player: &Player) -> Self {
        Self {
            lineup_id: lineup_id.to_string(),
            discord_user_id: *player.discord_user_id(),
            slot: player.slot() as i32,
            race: player.race().id(),
            data: player.data().to_string(),
        }
    }
}
