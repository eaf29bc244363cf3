//! Lineup aggregate and its player slots.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{ParsedEntry, Race, RuleSet, ValidationError};

/// Fewest slots a lineup may have.
pub const MIN_LENGTH: u32 = 1;
/// Most slots a lineup may have.
pub const MAX_LENGTH: u32 = 20;

/// Position of a player inside a lineup: slots are numbered per submitting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey {
    /// Submitting user.
    pub discord_user_id: i64,
    /// 1-based slot.
    pub slot: u32,
}

/// A committed slot entry.
///
/// Two players are equal when they share user and slot, whatever their
/// race or data.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
pub struct Player {
    discord_user_id: i64,
    entry: ParsedEntry,
}

impl Player {
    /// Key of this player within its lineup.
    pub fn key(&self) -> PlayerKey {
        PlayerKey {
            discord_user_id: self.discord_user_id,
            slot: *self.entry.slot(),
        }
    }

    /// 1-based slot.
    pub fn slot(&self) -> u32 {
        *self.entry.slot()
    }

    /// Race.
    pub fn race(&self) -> Race {
        *self.entry.race()
    }

    /// Raw id or label.
    pub fn data(&self) -> &str {
        self.entry.data()
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A fixed-size roster of player slots revealed at a set time.
///
/// Before `reveal_at` the lineup is hidden and accepts submissions; from
/// `reveal_at` on it is public and read-only. Equality is by id.
#[derive(Debug, Clone, Getters)]
pub struct Lineup {
    id: Uuid,
    rule_set_id: i32,
    rule_set: RuleSet,
    length: u32,
    reveal_at: DateTime<Utc>,
    #[getter(skip)]
    players: BTreeMap<PlayerKey, Player>,
}

impl Lineup {
    /// Creates an empty lineup.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `length` is outside `MIN_LENGTH..=MAX_LENGTH`.
    #[instrument(skip(rule_set))]
    pub fn new(
        id: Uuid,
        rule_set_id: i32,
        rule_set: RuleSet,
        length: u32,
        reveal_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(ValidationError::new(format!(
                "Lineup size must be between {} and {}",
                MIN_LENGTH, MAX_LENGTH
            )));
        }
        Ok(Self {
            id,
            rule_set_id,
            rule_set,
            length,
            reveal_at,
            players: BTreeMap::new(),
        })
    }

    /// Whether the lineup is public (and therefore read-only) at `now`.
    pub fn is_revealed_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.reveal_at
    }

    /// Stores a player, replacing the same user's entry in the same slot.
    ///
    /// Other users' slots with the same number are untouched.
    pub fn insert_player(&mut self, player: Player) -> Option<Player> {
        self.players.insert(player.key(), player)
    }

    /// Removes every slot submitted by `discord_user_id`, returning how many.
    #[instrument(skip(self), fields(lineup_id = %self.id))]
    pub fn clear_user(&mut self, discord_user_id: i64) -> usize {
        let before = self.players.len();
        self.players
            .retain(|key, _| key.discord_user_id != discord_user_id);
        let removed = before - self.players.len();
        debug!(removed, "Cleared user slots");
        removed
    }

    /// All players ordered by user, then slot.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Slots of one user in slot order.
    pub fn players_of(&self, discord_user_id: i64) -> Vec<&Player> {
        self.players
            .values()
            .filter(|p| *p.discord_user_id() == discord_user_id)
            .collect()
    }

    /// Players grouped by submitting user, users ascending.
    pub fn players_by_user(&self) -> BTreeMap<i64, Vec<&Player>> {
        let mut grouped: BTreeMap<i64, Vec<&Player>> = BTreeMap::new();
        for player in self.players.values() {
            grouped
                .entry(*player.discord_user_id())
                .or_default()
                .push(player);
        }
        grouped
    }

    /// Number of distinct users with at least one slot.
    pub fn submitted_users(&self) -> usize {
        self.players_by_user().len()
    }

    /// Total number of stored slots.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

impl PartialEq for Lineup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Lineup {}
