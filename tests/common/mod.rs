//! Shared fixtures: throw-away databases and a recording stats provider.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use lineup_bot::{
    CharacterIdentity, Lineup, LineupRepository, PerformanceSummary, Race, Region, RuleSet,
    StatsError, StatsProvider, StoredRuleSet,
};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
pub fn setup_test_db() -> (NamedTempFile, LineupRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = LineupRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

/// Stores a rule set.
pub fn store_rule_set(repo: &LineupRepository, rules: RuleSet) -> StoredRuleSet {
    repo.create_rule_set(&rules).expect("Create rule set failed")
}

/// Stores a lineup of `length` slots revealed at `reveal_at`.
pub fn store_lineup(
    repo: &LineupRepository,
    rules: RuleSet,
    length: u32,
    reveal_at: DateTime<Utc>,
) -> Lineup {
    let stored = store_rule_set(repo, rules);
    repo.create_lineup(*stored.id(), length, reveal_at)
        .expect("Create lineup failed")
        .expect("Rule set missing")
}

/// A lineup that opens an hour from `now`.
pub fn open_lineup(repo: &LineupRepository, rules: RuleSet, length: u32, now: DateTime<Utc>) -> Lineup {
    store_lineup(repo, rules, length, now + TimeDelta::hours(1))
}

/// Summary with the same average, peak and last rating.
pub fn summary(id: i64, race: Race, games: i32, rating: i32) -> PerformanceSummary {
    PerformanceSummary::new(id, race, games, rating, rating, rating, None)
}

/// Identity named `Player{id}#1` in Europe.
pub fn character(id: i64) -> CharacterIdentity {
    CharacterIdentity::new(id, Region::Eu, 1, format!("Player{}#1", id))
}

/// In-memory stats provider that records the id sets it was asked for.
#[derive(Debug, Default)]
pub struct FakeStats {
    summaries: Vec<PerformanceSummary>,
    characters: Vec<CharacterIdentity>,
    fail: bool,
    summary_calls: Mutex<Vec<BTreeSet<i64>>>,
    character_calls: Mutex<Vec<BTreeSet<i64>>>,
}

impl FakeStats {
    /// Provider answering with the given records.
    pub fn new(summaries: Vec<PerformanceSummary>, characters: Vec<CharacterIdentity>) -> Self {
        Self {
            summaries,
            characters,
            ..Self::default()
        }
    }

    /// Provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Id sets passed to `summaries`, in call order.
    pub fn summary_calls(&self) -> Vec<BTreeSet<i64>> {
        self.summary_calls.lock().expect("lock poisoned").clone()
    }

    /// Id sets passed to `characters`, in call order.
    pub fn character_calls(&self) -> Vec<BTreeSet<i64>> {
        self.character_calls.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl StatsProvider for FakeStats {
    async fn summaries(
        &self,
        _depth: i32,
        ids: &BTreeSet<i64>,
    ) -> Result<Vec<PerformanceSummary>, StatsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.summary_calls
            .lock()
            .expect("lock poisoned")
            .push(ids.clone());
        if self.fail {
            return Err(StatsError::new("provider unreachable"));
        }
        Ok(self
            .summaries
            .iter()
            .filter(|s| ids.contains(s.character_id()))
            .cloned()
            .collect())
    }

    async fn characters(&self, ids: &BTreeSet<i64>) -> Result<Vec<CharacterIdentity>, StatsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.character_calls
            .lock()
            .expect("lock poisoned")
            .push(ids.clone());
        if self.fail {
            return Err(StatsError::new("provider unreachable"));
        }
        Ok(self
            .characters
            .iter()
            .filter(|c| ids.contains(c.id()))
            .cloned()
            .collect())
    }
}
