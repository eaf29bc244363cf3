//! Batched ladder lookups and per-entry eligibility evaluation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use derive_getters::Getters;
use lineup_core::{CharacterIdentity, ParsedEntry, PerformanceSummary, Race, RuleSet, Violation};
use tracing::{debug, info, instrument};

use crate::{StatsError, StatsProvider};

/// Display status of a verified entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// Looked up with no violations.
    Success,
    /// Looked up with at least one violation.
    Error,
    /// Freeform label, never looked up.
    Unknown,
}

/// One roster entry with its verification result.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct VerifiedEntry {
    entry: ParsedEntry,
    /// Resolved identity, when the provider knows the id.
    character: Option<CharacterIdentity>,
    violations: Vec<Violation>,
    status: EntryStatus,
}

impl VerifiedEntry {
    fn unknown(entry: ParsedEntry) -> Self {
        Self {
            entry,
            character: None,
            violations: Vec::new(),
            status: EntryStatus::Unknown,
        }
    }

    fn checked(
        entry: ParsedEntry,
        character: Option<CharacterIdentity>,
        violations: Vec<Violation>,
    ) -> Self {
        let status = if violations.is_empty() {
            EntryStatus::Success
        } else {
            EntryStatus::Error
        };
        Self {
            entry,
            character,
            violations,
            status,
        }
    }
}

/// Verified entries in ascending slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Verification {
    entries: Vec<VerifiedEntry>,
}

impl Verification {
    /// Whether no entry has a violation.
    pub fn accepted(&self) -> bool {
        self.entries.iter().all(|e| e.violations.is_empty())
    }

    /// Entries that failed at least one check.
    pub fn rejected_entries(&self) -> impl Iterator<Item = &VerifiedEntry> {
        self.entries.iter().filter(|e| !e.violations.is_empty())
    }
}

/// Provider data for one batch of ids.
#[derive(Debug, Clone, Default)]
pub struct LadderSnapshot {
    summaries: HashMap<(i64, Race), PerformanceSummary>,
    characters: HashMap<i64, CharacterIdentity>,
}

impl LadderSnapshot {
    /// Builds a snapshot from provider records.
    pub fn new(summaries: Vec<PerformanceSummary>, characters: Vec<CharacterIdentity>) -> Self {
        Self {
            summaries: summaries
                .into_iter()
                .map(|s| ((*s.character_id(), *s.race()), s))
                .collect(),
            characters: characters.into_iter().map(|c| (*c.id(), c)).collect(),
        }
    }

    /// Summary for an exact id and race.
    pub fn summary(&self, id: i64, race: Race) -> Option<&PerformanceSummary> {
        self.summaries.get(&(id, race))
    }

    /// Evaluates entries against `rules`.
    ///
    /// Reference entries are matched on (id, race); a missing match is
    /// evaluated as absent. Freeform entries are not evaluated. The result
    /// is in slot order whatever the input order.
    #[instrument(skip_all, fields(entries = entries.len()))]
    pub fn verify(&self, rules: &RuleSet, entries: &[ParsedEntry]) -> Verification {
        let mut verified: Vec<VerifiedEntry> = entries
            .iter()
            .map(|entry| match entry.reference_id() {
                None => VerifiedEntry::unknown(entry.clone()),
                Some(id) => {
                    let summary = self.summary(id, *entry.race());
                    VerifiedEntry::checked(
                        entry.clone(),
                        self.characters.get(&id).cloned(),
                        rules.evaluate(summary),
                    )
                }
            })
            .collect();
        verified.sort_by_key(|v| *v.entry.slot());

        let verification = Verification { entries: verified };
        debug!(accepted = verification.accepted(), "Entries verified");
        verification
    }
}

/// Fetches ladder data for deduplicated ids.
#[derive(Clone)]
pub struct Verifier {
    stats: Arc<dyn StatsProvider>,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier").finish_non_exhaustive()
    }
}

impl Verifier {
    /// Creates a verifier over a stats provider.
    pub fn new(stats: Arc<dyn StatsProvider>) -> Self {
        Self { stats }
    }

    /// Reference ids of `entries`, each once.
    pub fn reference_ids<'a>(entries: impl IntoIterator<Item = &'a ParsedEntry>) -> BTreeSet<i64> {
        entries
            .into_iter()
            .filter_map(ParsedEntry::reference_id)
            .collect()
    }

    /// Fetches summaries over `depth` days and identities for `ids`, one
    /// batch call each.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if either call fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn snapshot(&self, depth: i32, ids: &BTreeSet<i64>) -> Result<LadderSnapshot, StatsError> {
        if ids.is_empty() {
            debug!("No reference entries, skipping lookup");
            return Ok(LadderSnapshot::default());
        }
        let summaries = self.stats.summaries(depth, ids).await?;
        let characters = self.stats.characters(ids).await?;
        info!(
            summaries = summaries.len(),
            characters = characters.len(),
            "Ladder snapshot fetched"
        );
        Ok(LadderSnapshot::new(summaries, characters))
    }

    /// Looks up and evaluates one roster.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the lookup fails.
    #[instrument(skip_all, fields(entries = entries.len()))]
    pub async fn verify(&self, rules: &RuleSet, entries: &[ParsedEntry]) -> Result<Verification, StatsError> {
        let ids = Self::reference_ids(entries);
        let snapshot = self.snapshot(*rules.depth(), &ids).await?;
        Ok(snapshot.verify(rules, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_core::{Region, parse_roster};

    fn summary(id: i64, race: Race, games: i32) -> PerformanceSummary {
        PerformanceSummary::new(id, race, games, 4000, 4200, 4100, None)
    }

    #[test]
    fn test_output_sorted_by_slot() {
        let rules = RuleSet::new("r", 30).unwrap();
        let mut entries = parse_roster("Alice z, 1233, Bob t").unwrap();
        entries.reverse();
        let snapshot = LadderSnapshot::new(
            vec![summary(123, Race::Zerg, 10)],
            vec![CharacterIdentity::new(123, Region::Eu, 1, "Serral#1".to_string())],
        );
        let verification = snapshot.verify(&rules, &entries);
        let slots: Vec<u32> = verification
            .entries()
            .iter()
            .map(|e| *e.entry().slot())
            .collect();
        assert_eq!(slots, [1, 2, 3]);
        assert_eq!(*verification.entries()[1].status(), EntryStatus::Success);
        assert_eq!(*verification.entries()[0].status(), EntryStatus::Unknown);
    }

    #[test]
    fn test_race_must_match_exactly() {
        let rules = RuleSet::new("r", 30).unwrap();
        let entries = parse_roster("123 z").unwrap();
        let snapshot = LadderSnapshot::new(vec![summary(123, Race::Terran, 100)], vec![]);
        let verification = snapshot.verify(&rules, &entries);
        assert!(!verification.accepted());
        assert_eq!(verification.entries()[0].violations(), &[Violation::Inactive]);
        assert_eq!(verification.rejected_entries().count(), 1);
    }

    #[test]
    fn test_reference_ids_deduplicated() {
        let entries = parse_roster("1233, 123 t, 4561, Alice p").unwrap();
        let ids = Verifier::reference_ids(&entries);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), [123, 456]);
    }
}
