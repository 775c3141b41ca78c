//! Integration tests for replaying event logs into repositories.

use std::collections::BTreeMap;
use std::io::Cursor;
use store::{
    fold_events, parse_event_log, replay_events, JsonFileRepository, LoggedEvent,
    TasteRepository,
};
use taste_model::{TasteEvent, UserTaste};
use tempfile::TempDir;

const LOG: &str = r#"
{"user_id":1,"event":{"type":"review_created","movie_id":42,"genres":["drama","noir"],"rating":4.0}}
{"user_id":2,"event":{"type":"like_toggled","movie_id":7,"genres":["comedy"]}}
{"user_id":1,"event":{"type":"review_edited","movie_id":42,"genres":["drama","noir"],"original_rating":4.0,"updated_rating":1.0}}
{"user_id":2,"event":{"type":"movie_unliked","movie_id":99,"genres":["horror"]}}
{"user_id":1,"event":{"type":"movie_liked","movie_id":42,"genres":["drama","noir"]}}
{"user_id":2,"event":{"type":"flags_updated","is_b_lover":false,"is_hipster":true}}
"#;

fn sequential(events: &[LoggedEvent]) -> BTreeMap<u32, UserTaste> {
    let mut state: BTreeMap<u32, UserTaste> = BTreeMap::new();
    for logged in events {
        let taste = state
            .remove(&logged.user_id)
            .unwrap_or_else(|| UserTaste::new(logged.user_id));
        state.insert(logged.user_id, taste.apply(&logged.event));
    }
    state
}

#[test]
fn test_parallel_fold_matches_sequential() {
    let events = parse_event_log(Cursor::new(LOG)).unwrap();
    assert_eq!(fold_events(BTreeMap::new(), &events), sequential(&events));
}

#[test]
fn test_replay_into_file_and_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let events = parse_event_log(Cursor::new(LOG)).unwrap();

    {
        let repo = JsonFileRepository::open(&path).unwrap();
        let summary = replay_events(&repo, &events).unwrap();
        assert_eq!(summary.events, 6);
        assert_eq!(summary.users, 2);
    }

    let repo = JsonFileRepository::open(&path).unwrap();
    assert_eq!(repo.user_ids().unwrap(), vec![1, 2]);

    let user1 = repo.load(1).unwrap().value;
    assert_eq!(user1.watched.count(42), 2);
    // 6, then -12 from the edit, then +10 from the like
    assert_eq!(user1.affinity.score("drama"), Some(4));
    assert_eq!(user1.affinity.score("noir"), Some(4));

    let user2 = repo.load(2).unwrap().value;
    assert!(user2.is_liked(7));
    assert_eq!(user2.affinity.score("horror"), None);
    assert!(user2.flags.is_hipster);
}

#[test]
fn test_second_replay_builds_on_stored_state() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileRepository::open(dir.path().join("state.json")).unwrap();
    let toggle = vec![LoggedEvent {
        user_id: 5,
        event: TasteEvent::LikeToggled {
            movie_id: 1,
            genres: vec!["war".to_string()],
        },
    }];

    replay_events(&repo, &toggle).unwrap();
    replay_events(&repo, &toggle).unwrap();

    let stored = repo.load(5).unwrap();
    assert_eq!(stored.version, 2);
    assert!(!stored.value.is_liked(1));
    assert!(stored.value.watched.is_empty());
    assert_eq!(stored.value.affinity.score("war"), Some(0));
}

#[test]
fn test_failed_replay_can_be_rerun() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, "").unwrap();
    let path = blocker.join("state.json");
    let events = parse_event_log(Cursor::new(LOG)).unwrap();

    // `data` is a file, so the state directory cannot be created
    let repo = JsonFileRepository::open(&path).unwrap();
    assert!(replay_events(&repo, &events).is_err());
    assert!(repo.user_ids().unwrap().is_empty());

    std::fs::remove_file(&blocker).unwrap();
    replay_events(&repo, &events).unwrap();

    let user1 = JsonFileRepository::open(&path).unwrap().load(1).unwrap();
    assert_eq!(user1.version, 1);
    assert_eq!(user1.value.watched.count(42), 2);
    assert_eq!(user1.value.affinity.score("drama"), Some(4));
}
