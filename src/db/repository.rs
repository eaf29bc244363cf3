//! Database repository for rule sets, lineups and players.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use lineup_core::{Lineup, Player, RuleSet};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::db::{
    DbError, LineupRecord, NewLineup, NewPlayer, NewRuleSet, PlayerRecord, RuleSetRecord,
    StoredRuleSet, schema,
};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer's lock before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Result of [`LineupRepository::find_and_clear`].
#[derive(Debug, Clone)]
pub enum ClearOutcome {
    /// No lineup with that id.
    NotFound,
    /// The lineup is past its reveal time; nothing was removed.
    Revealed(Lineup),
    /// The user's previous slots were removed.
    Cleared {
        /// Lineup without the user's slots.
        lineup: Lineup,
        /// Number of rows deleted.
        removed: usize,
    },
}

/// Database repository for lineup operations.
#[derive(Debug, Clone)]
pub struct LineupRepository {
    db_path: String,
}

impl LineupRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path must not be empty"));
        }
        info!(path = %db_path, "Creating LineupRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection that waits on locks held by
    /// concurrent writers and lets readers proceed during a write.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            BUSY_TIMEOUT_MS
        ))?;
        Ok(conn)
    }

    /// Applies pending embedded migrations, returning how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Persists a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, rule_set), fields(name = %rule_set.name(), depth = rule_set.depth()))]
    pub fn create_rule_set(&self, rule_set: &RuleSet) -> Result<StoredRuleSet, DbError> {
        let mut conn = self.connection()?;

        let record = diesel::insert_into(schema::rule_sets::table)
            .values(NewRuleSet::from(rule_set))
            .returning(RuleSetRecord::as_returning())
            .get_result(&mut conn)?;

        info!(rule_set_id = record.id(), "Rule set created");
        record.to_stored()
    }

    /// Gets a rule set by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_rule_set(&self, id: i32) -> Result<Option<StoredRuleSet>, DbError> {
        let mut conn = self.connection()?;
        find_rule_set(&mut conn, id)
    }

    /// Creates an empty lineup under an existing rule set.
    ///
    /// Returns `None` if the rule set does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if `length` is out of range or a database error occurs.
    #[instrument(skip(self))]
    pub fn create_lineup(
        &self,
        rule_set_id: i32,
        length: u32,
        reveal_at: DateTime<Utc>,
    ) -> Result<Option<Lineup>, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let Some(stored) = find_rule_set(conn, rule_set_id)? else {
                debug!("Rule set not found");
                return Ok(None);
            };

            let lineup = Lineup::new(
                Uuid::new_v4(),
                rule_set_id,
                stored.rule_set().clone(),
                length,
                reveal_at,
            )?;

            diesel::insert_into(schema::lineups::table)
                .values(NewLineup::new(
                    lineup.id().to_string(),
                    rule_set_id,
                    length as i32,
                    reveal_at.naive_utc(),
                ))
                .execute(conn)?;

            info!(lineup_id = %lineup.id(), "Lineup created");
            Ok(Some(lineup))
        })
    }

    /// Loads a lineup with its rule set and players. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self), fields(lineup_id = %id))]
    pub fn find_lineup(&self, id: Uuid) -> Result<Option<Lineup>, DbError> {
        let mut conn = self.connection()?;
        let Some(record) = find_lineup_record(&mut conn, id)? else {
            debug!("Lineup not found");
            return Ok(None);
        };
        load_lineup(&mut conn, &record).map(Some)
    }

    /// Loads a lineup and, while it is still hidden at `now`, removes every
    /// slot previously stored by `discord_user_id`. Both happen in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self), fields(lineup_id = %id))]
    pub fn find_and_clear(
        &self,
        id: Uuid,
        discord_user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ClearOutcome, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let Some(record) = find_lineup_record(conn, id)? else {
                debug!("Lineup not found");
                return Ok(ClearOutcome::NotFound);
            };
            let mut lineup = load_lineup(conn, &record)?;
            if lineup.is_revealed_at(now) {
                warn!("Lineup already revealed, keeping players");
                return Ok(ClearOutcome::Revealed(lineup));
            }

            let removed = diesel::delete(
                schema::players::table
                    .filter(schema::players::lineup_id.eq(record.id()))
                    .filter(schema::players::discord_user_id.eq(discord_user_id)),
            )
            .execute(conn)?;
            lineup.clear_user(discord_user_id);

            debug!(removed, "Previous submission cleared");
            Ok(ClearOutcome::Cleared { lineup, removed })
        })
    }

    /// Stores players of a lineup in one batch.
    ///
    /// Rows already stored by the same users are replaced, so saving the
    /// same submission twice leaves one copy.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, players), fields(lineup_id = %lineup_id, count = players.len()))]
    pub fn save_players(&self, lineup_id: Uuid, players: &[Player]) -> Result<usize, DbError> {
        if players.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewPlayer> = players
            .iter()
            .map(|player| NewPlayer::from_player(lineup_id, player))
            .collect();
        let users: Vec<i64> = players
            .iter()
            .map(|player| *player.discord_user_id())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let lineup_id = lineup_id.to_string();

        let mut conn = self.connection()?;
        let inserted = conn.immediate_transaction::<_, DbError, _>(|conn| {
            diesel::delete(
                schema::players::table
                    .filter(schema::players::lineup_id.eq(&lineup_id))
                    .filter(schema::players::discord_user_id.eq_any(&users)),
            )
            .execute(conn)?;
            let inserted = diesel::insert_into(schema::players::table)
                .values(&rows)
                .execute(conn)?;
            Ok(inserted)
        })?;

        info!(inserted, "Players saved");
        Ok(inserted)
    }

    /// Deletes lineups, and their players, revealed before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn remove_revealed_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let ids: Vec<String> = schema::lineups::table
                .filter(schema::lineups::reveal_at.lt(cutoff.naive_utc()))
                .select(schema::lineups::id)
                .load(conn)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let players = diesel::delete(
                schema::players::table.filter(schema::players::lineup_id.eq_any(&ids)),
            )
            .execute(conn)?;
            let lineups = diesel::delete(schema::lineups::table.filter(schema::lineups::id.eq_any(&ids)))
                .execute(conn)?;

            debug!(lineups, players, "Expired lineups deleted");
            Ok(lineups)
        })
    }
}

fn find_rule_set(conn: &mut SqliteConnection, id: i32) -> Result<Option<StoredRuleSet>, DbError> {
    schema::rule_sets::table
        .find(id)
        .select(RuleSetRecord::as_select())
        .first(conn)
        .optional()?
        .map(|record| record.to_stored())
        .transpose()
}

fn find_lineup_record(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<LineupRecord>, DbError> {
    let record = schema::lineups::table
        .find(id.to_string())
        .select(LineupRecord::as_select())
        .first(conn)
        .optional()?;
    Ok(record)
}

fn load_lineup(conn: &mut SqliteConnection, record: &LineupRecord) -> Result<Lineup, DbError> {
    let stored = find_rule_set(conn, *record.rule_set_id())?.ok_or_else(|| {
        DbError::new(format!(
            "Lineup '{}' references missing rule set {}",
            record.id(),
            record.rule_set_id()
        ))
    })?;
    let length = u32::try_from(*record.length())
        .map_err(|_| DbError::new(format!("Invalid lineup length: {}", record.length())))?;

    let mut lineup = Lineup::new(
        record.uuid()?,
        *stored.id(),
        stored.rule_set().clone(),
        length,
        record.reveal_at().and_utc(),
    )?;

    let rows = PlayerRecord::belonging_to(record)
        .select(PlayerRecord::as_select())
        .order((
            schema::players::discord_user_id.asc(),
            schema::players::slot.asc(),
        ))
        .load(conn)?;
    for row in &rows {
        lineup.insert_player(row.to_player()?);
    }

    debug!(lineup_id = %lineup.id(), players = rows.len(), "Lineup loaded");
    Ok(lineup)
}
