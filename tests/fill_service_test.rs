//! Tests for the lineup fill pipeline.

mod common;

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use lineup_bot::{
    EntryStatus, FillOutcome, FillService, LineupRepository, Race, ReportFormatter, RuleSet,
    ServiceError, Verifier, Violation,
};
use uuid::Uuid;

use common::{FakeStats, character, open_lineup, setup_test_db, store_lineup, summary};

fn service(repo: &LineupRepository, stats: &Arc<FakeStats>) -> FillService {
    FillService::new(repo.clone(), Verifier::new(stats.clone()))
}

fn formatter() -> ReportFormatter {
    ReportFormatter::new(Default::default(), "https://ladder.test/{id}".to_string())
}

fn rules() -> RuleSet {
    RuleSet::new("cup", 120)
        .expect("Invalid rule set")
        .with_games_min(Some(50))
}

fn stored_count(repo: &LineupRepository, id: Uuid, user: i64) -> usize {
    repo.find_lineup(id)
        .expect("Query failed")
        .expect("Lineup missing")
        .players_of(user)
        .len()
}

#[tokio::test]
async fn test_accepted_roster_is_saved() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 2, now);
    let stats = Arc::new(FakeStats::new(
        vec![summary(123, Race::Zerg, 80, 4000)],
        vec![character(123)],
    ));

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "1233, Alice p", now)
        .await
        .expect("Fill failed");

    assert!(outcome.accepted());
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 2);
    let text = outcome.render(&formatter());
    assert!(text.starts_with("```diff\n+Lineup filled:\n```\n**Ruleset**\n"));
    assert!(text.contains("**<@7> players**\n"));
    assert!(text.contains(":white_check_mark: `1`"));
    assert!(text.contains(":grey_question: `2` Protoss Alice"));
}

#[tokio::test]
async fn test_length_mismatch_reports_counts() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 3, now);
    let stats = Arc::new(FakeStats::default());

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "Alice z, Bob t", now)
        .await
        .expect("Fill failed");

    match &outcome {
        FillOutcome::LengthMismatch {
            required, received, ..
        } => {
            assert_eq!(*required, 3);
            assert_eq!(*received, 2);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(outcome
        .render(&formatter())
        .ends_with("**Players required:** 3\n**Players received:** 2\n"));
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 0);
    assert!(stats.summary_calls().is_empty());
}

#[tokio::test]
async fn test_parse_error_names_slot() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 2, now);
    let stats = Arc::new(FakeStats::default());

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "Alice z, Bob x", now)
        .await
        .expect("Fill failed");

    match &outcome {
        FillOutcome::ParseFailed { error, .. } => assert_eq!(*error.slot(), 2),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(
        outcome.render(&formatter()),
        "```diff\n-Invalid lineup. Slot 2. Invalid race: x\n```\n"
    );
}

#[tokio::test]
async fn test_resubmission_is_idempotent() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 2, now);
    let stats = Arc::new(FakeStats::default());
    let service = service(&repo, &stats);

    for _ in 0..2 {
        let outcome = service
            .fill(*lineup.id(), 7, "Alice z, Bob t", now)
            .await
            .expect("Fill failed");
        assert!(outcome.accepted());
    }
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 2);
}

#[tokio::test]
async fn test_duplicate_ids_looked_up_once() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 3, now);
    let stats = Arc::new(FakeStats::new(
        vec![
            summary(123, Race::Zerg, 80, 4000),
            summary(123, Race::Terran, 80, 4000),
        ],
        vec![character(123)],
    ));

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "1233, 123 t, Alice p", now)
        .await
        .expect("Fill failed");

    assert!(outcome.accepted());
    let calls = stats.summary_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].iter().copied().collect::<Vec<_>>(), [123]);
    assert_eq!(stats.character_calls().len(), 1);
}

#[tokio::test]
async fn test_race_mismatch_is_inactive() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::new(
        vec![summary(123, Race::Terran, 80, 4000)],
        vec![character(123)],
    ));

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "123 z", now)
        .await
        .expect("Fill failed");

    let FillOutcome::Checked { verification, .. } = &outcome else {
        panic!("unexpected outcome: {:?}", outcome);
    };
    assert!(!verification.accepted());
    assert_eq!(verification.entries()[0].violations(), &[Violation::Inactive]);
    assert!(outcome
        .render(&formatter())
        .contains("player is inactive (no games played)"));
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 0);
}

#[tokio::test]
async fn test_games_below_minimum_rejected() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::new(
        vec![summary(123, Race::Zerg, 49, 4000)],
        vec![character(123)],
    ));

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "1233", now)
        .await
        .expect("Fill failed");

    let text = outcome.render(&formatter());
    assert!(text.starts_with("```diff\n-Can't save the lineup due to ruleset violations\n```\n"));
    assert!(text.contains(":x: `1`"));
    assert!(text.contains("games: 49"));
}

#[tokio::test]
async fn test_freeform_accepted_without_lookup() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::default());

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "Alice z", now)
        .await
        .expect("Fill failed");

    let FillOutcome::Checked { verification, .. } = &outcome else {
        panic!("unexpected outcome: {:?}", outcome);
    };
    assert!(verification.accepted());
    assert_eq!(*verification.entries()[0].status(), EntryStatus::Unknown);
    assert!(verification.entries()[0].violations().is_empty());
    assert!(stats.summary_calls().is_empty());
}

#[tokio::test]
async fn test_revealed_lineup_keeps_players() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::default());
    let service = service(&repo, &stats);

    service
        .fill(*lineup.id(), 7, "Alice z", now)
        .await
        .expect("Fill failed");

    let later = now + TimeDelta::hours(2);
    let outcome = service
        .fill(*lineup.id(), 7, "Bob t", later)
        .await
        .expect("Fill failed");

    assert!(matches!(outcome, FillOutcome::Revealed(_)));
    assert!(outcome
        .render(&formatter())
        .starts_with("```diff\n-Can't save the lineup because it might already be revealed.\n```\n**Ruleset**\n"));
    let found = repo
        .find_lineup(*lineup.id())
        .expect("Query failed")
        .expect("Lineup missing");
    assert_eq!(found.players_of(7)[0].data(), "Alice");
}

#[tokio::test]
async fn test_reveal_time_is_inclusive() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = store_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::default());

    let outcome = service(&repo, &stats)
        .fill(*lineup.id(), 7, "Alice z", *lineup.reveal_at())
        .await
        .expect("Fill failed");
    assert!(matches!(outcome, FillOutcome::Revealed(_)));
}

#[tokio::test]
async fn test_rejected_fill_clears_previous_submission() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::new(
        vec![summary(123, Race::Zerg, 10, 4000)],
        vec![character(123)],
    ));
    let service = service(&repo, &stats);

    service
        .fill(*lineup.id(), 7, "Alice z", now)
        .await
        .expect("Fill failed");
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 1);

    let outcome = service
        .fill(*lineup.id(), 7, "1233", now)
        .await
        .expect("Fill failed");
    assert!(!outcome.accepted());
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 0);
}

#[tokio::test]
async fn test_users_do_not_evict_each_other() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::default());
    let service = service(&repo, &stats);

    service
        .fill(*lineup.id(), 1, "Alice z", now)
        .await
        .expect("Fill failed");
    service
        .fill(*lineup.id(), 2, "Bob t", now)
        .await
        .expect("Fill failed");

    assert_eq!(stored_count(&repo, *lineup.id(), 1), 1);
    assert_eq!(stored_count(&repo, *lineup.id(), 2), 1);
}

#[tokio::test]
async fn test_provider_failure_aborts_without_saving() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 1, now);
    let stats = Arc::new(FakeStats::failing());

    let result = service(&repo, &stats)
        .fill(*lineup.id(), 7, "1233", now)
        .await;

    assert!(matches!(result, Err(ServiceError::Stats(_))));
    assert_eq!(stored_count(&repo, *lineup.id(), 7), 0);
}

#[tokio::test]
async fn test_unknown_lineup() {
    let (_db, repo) = setup_test_db();
    let stats = Arc::new(FakeStats::default());
    let id = Uuid::new_v4();

    let outcome = service(&repo, &stats)
        .fill(id, 7, "Alice z", Utc::now())
        .await
        .expect("Fill failed");

    assert_eq!(
        outcome.render(&formatter()),
        format!("`{}` lineup not found", id)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_fills_by_different_users() {
    let (_db, repo) = setup_test_db();
    let now = Utc::now();
    let lineup = open_lineup(&repo, rules(), 2, now);
    let stats = Arc::new(FakeStats::default());
    let fill = service(&repo, &stats);

    let tasks: Vec<_> = (1..=8i64)
        .map(|user| {
            let fill = fill.clone();
            let id = *lineup.id();
            tokio::spawn(async move {
                for _ in 0..20 {
                    let outcome = fill.fill(id, user, "Alice z, Bob t", now).await?;
                    assert!(outcome.accepted());
                }
                Ok::<_, ServiceError>(())
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("Task panicked").expect("Fill failed");
    }

    let stored = repo
        .find_lineup(*lineup.id())
        .expect("Query failed")
        .expect("Lineup missing");
    assert_eq!(stored.submitted_users(), 8);
    assert_eq!(stored.player_count(), 16);
    for user in 1..=8 {
        assert_eq!(stored.players_of(user).len(), 2);
    }
}
