//! End-to-end scoring flows against an on-disk document

mod common;

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::thread;

use beltboard::config::EVENTS_MAX_KEY;
use beltboard::{BoardError, Config, EventKind, LinkParams, Standing, StoreState};

use common::{register_all, TestStore};

#[test]
fn test_year_of_scoring_survives_reload() {
    let store = TestStore::new();
    let config = Config::with_defaults();

    let board = store.open(&config);
    register_all(&board, &["amy", "bob", "cat"]);

    let pr = LinkParams::from_pairs([
        ("id", "GH7"),
        ("linkId", "7"),
        ("org", "acme"),
        ("board", "widgets"),
        ("pool", "github.pulls"),
    ]);
    board.increment("amy", "github.pulls", 25, &pr).unwrap();
    board
        .increment("amy", "trello.cards", 17, &LinkParams::new("TR1"))
        .unwrap();
    board
        .increment("cat", "github.issues", 6, &LinkParams::new("GH8"))
        .unwrap();
    assert_eq!(board.refresh_levels(), vec!["amy", "cat"]);
    board.persist().unwrap();

    let board = store.open(&config);
    let chart = board.leaderboard(None);
    assert_eq!(chart.labels, vec!["Amy", "Cat"]);
    assert_eq!(chart.values(), &[42, 6]);
    assert_eq!(chart.metadata, vec!["amy|red|Unknown", "cat|blue|Unknown"]);

    let events = board.events();
    assert_eq!(events[0].source, "<https://github.com/acme/widgets/pull/7>");
    assert_eq!(events[1].source, "");
    assert_eq!(events.back().map(|e| e.kind), Some(EventKind::LevelUp));

    let summary = board.summary("amy").unwrap();
    assert_eq!(summary.pools.get("github"), Some(&25));
    assert_eq!(summary.pools.get("trello"), Some(&17));
}

#[test]
fn test_archive_resets_and_badges_carry_over() {
    let store = TestStore::new();
    let config = Config::with_defaults();
    let board = store.open(&config);
    register_all(&board, &["amy", "bob"]);

    board
        .increment("amy", "github", 42, &LinkParams::new("GH1"))
        .unwrap();
    board.refresh_levels();
    board.add_task("Write the changelog", "amy").unwrap();

    assert_eq!(board.archive_year("2024").unwrap(), "2024");
    board.persist().unwrap();

    let board = store.open(&config);
    let snapshot = board.snapshot();
    assert!(snapshot.scorecards.is_empty());
    assert!(snapshot.tasks.is_empty());
    assert_eq!(snapshot.users["amy"].level.as_deref(), Some("ZERO"));
    assert_eq!(
        snapshot.scorecard_history["2024"].get("amy"),
        Some(&Standing::new("RED", 42))
    );
    assert!(snapshot.scorecard_history["2024"].get("bob").is_none());

    // History stays in the compact "level|total" form on disk
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["scorecardHistory"]["2024"]["amy"], "RED|42");

    let chart = board.leaderboard(Some(10));
    assert_eq!(chart.history_badges[0], "2024|RED|42");

    let before = board.snapshot();
    assert!(matches!(
        board.archive_year("2024"),
        Err(BoardError::YearExists(_))
    ));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_concurrent_increments_respect_event_ceiling() {
    let store = TestStore::new();
    let config = Config::with_defaults().with_option(EVENTS_MAX_KEY, "100");
    let board = Arc::new(store.open(&config));
    register_all(&board, &["amy", "bob"]);

    let handles: Vec<_> = ["amy", "bob"]
        .into_iter()
        .flat_map(|user| (0..4).map(move |_| user))
        .map(|user| {
            let board = Arc::clone(&board);
            thread::spawn(move || {
                for _ in 0..100 {
                    board
                        .increment(user, "github", 1, &LinkParams::new("GH1"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(board.summary("amy").unwrap().total, 400);
    assert_eq!(board.summary("bob").unwrap().total, 400);
    assert_eq!(board.events().len(), 100);
    board.persist().unwrap();

    let reloaded: StoreState =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(reloaded.events.len(), 100);
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let store = TestStore::new();
    let config = Config::with_defaults()
        .with_option("thresholds", "0:ZERO,abc:BLUE")
        .with_option(EVENTS_MAX_KEY, "-5");
    let board = store.open(&config);
    register_all(&board, &["amy"]);

    assert_eq!(board.levels().top().name, "BLACK");
    assert_eq!(board.events_max(), 1_000_000);
    assert_eq!(board.next_level_progress("amy").remaining_to_next, 5);
}

#[test]
fn test_custom_threshold_table() {
    let store = TestStore::new();
    let config = Config::with_defaults().with_option("thresholds", "0:WHITE,10:GREEN,50:GOLD");
    let board = store.open(&config);
    register_all(&board, &["amy"]);

    board
        .increment("amy", "github", 12, &LinkParams::new("GH1"))
        .unwrap();
    assert_eq!(board.refresh_levels(), vec!["amy"]);

    let chart = board.leaderboard(None);
    assert_eq!(chart.metadata, vec!["amy|green|Unknown"]);
    assert_eq!(
        chart.datasets[0].background_color[0],
        "rgba(65, 168, 95,0.7)"
    );
    assert_eq!(board.next_level_progress("amy").remaining_to_next, 38);

    let table = board.scorecards_table();
    assert_eq!(table.data[0].level, "GREEN");
    assert_eq!(table.data[0].points_to_next_level, 38);
}

#[test]
fn test_user_edits_and_duplicate_awards() {
    let store = TestStore::new();
    let board = store.open(&Config::with_defaults());
    register_all(&board, &["amy"]);

    let values: BTreeMap<String, String> = [
        ("trelloId".to_string(), "amy-t".to_string()),
        ("level".to_string(), "BLACK".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(board.update_user("amy", &values).unwrap(), 1);
    assert_eq!(board.scorecard("amy").unwrap().attributes["level"], "ZERO");
    assert!(board.users_missing_attribute("trelloId").is_empty());
    assert_eq!(board.users_missing_attribute("githubId").len(), 1);

    assert!(board.claim_once("GH1.amy"));
    assert!(!board.claim_once("GH1.amy"));
    board.persist().unwrap();

    let board = store.open(&Config::with_defaults());
    assert!(!board.claim_once("GH1.amy"));
    assert!(board
        .register_user("amy", None, None, BTreeMap::new())
        .unwrap_err()
        .is_conflict());
}

#[test]
fn test_unstorable_level_names_never_reach_the_archive() {
    let store = TestStore::new();
    let config = Config::with_defaults().with_option("thresholds", "0:ZE|RO,5:BLUE");
    let board = store.open(&config);
    register_all(&board, &["amy"]);

    board
        .increment("amy", "github", 3, &LinkParams::new("GH1"))
        .unwrap();
    board.archive_year("2024").unwrap();
    board.persist().unwrap();

    let board = store.open(&config);
    assert_eq!(board.snapshot().users.len(), 1);
    assert_eq!(
        board.history()["2024"].get("amy"),
        Some(&Standing::new("ZERO", 3))
    );
}

#[test]
fn test_document_with_separator_in_level_still_loads() {
    let store = TestStore::new();
    fs::write(
        store.path(),
        r#"{"users": {"amy": {}}, "scorecardHistory": {"2023": {"amy": "ZE|RO|3"}}}"#,
    )
    .unwrap();

    let board = store.open(&Config::with_defaults());

    assert_eq!(board.snapshot().users.len(), 1);
    assert_eq!(
        board.history()["2023"].get("amy"),
        Some(&Standing::new("ZE|RO", 3))
    );
}

#[test]
fn test_overflowing_increment_is_rejected() {
    let store = TestStore::new();
    let board = store.open(&Config::with_defaults());
    register_all(&board, &["amy"]);
    let link = LinkParams::new("GH1");

    board.increment("amy", "a", i64::MAX, &link).unwrap();
    assert!(matches!(
        board.increment("amy", "a", 1, &link),
        Err(BoardError::Validation(_))
    ));
    board.increment("amy", "b", 1, &link).unwrap();

    assert_eq!(board.summary("amy").unwrap().total, i64::MAX);
    assert_eq!(board.leaderboard(Some(5)).values(), &[i64::MAX]);
    assert_eq!(board.events().len(), 2);
}

#[test]
fn test_corrupt_document_does_not_crash() {
    let store = TestStore::new();
    fs::write(store.path(), "{ not json").unwrap();

    let board = store.open(&Config::with_defaults());

    assert!(board.snapshot().users.is_empty());
    assert!(board.leaderboard(None).labels.is_empty());
    // Nothing was written over the unreadable document on open
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
}
