//! Unit tests for the rocket store, aggregation and listing.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rocket_types::{EventKind, RocketId, RocketState, RocketStatus, TelemetryEvent};
use uuid::Uuid;

use crate::listing::{SortField, SortOrder};
use crate::service::{ProcessOutcome, RocketService};
use crate::store::{InMemoryRocketStore, RocketStore};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn service() -> (Arc<InMemoryRocketStore>, RocketService) {
    let store = Arc::new(InMemoryRocketStore::new());
    let service = RocketService::new(store.clone());
    (store, service)
}

fn event(id: RocketId, sequence: u64, kind: EventKind) -> TelemetryEvent {
    TelemetryEvent {
        rocket_id: id,
        sequence,
        time: t0() + Duration::seconds(sequence as i64),
        kind,
    }
}

fn launched(id: RocketId, sequence: u64, speed: i64) -> TelemetryEvent {
    event(
        id,
        sequence,
        EventKind::Launched {
            rocket_type: "Falcon-9".to_string(),
            launch_speed: speed,
            mission: "ARTEMIS".to_string(),
        },
    )
}

fn state_with_speed(speed: i64, rocket_type: &str, minutes: i64) -> RocketState {
    let mut state = RocketState::new(Uuid::new_v4());
    state.speed = speed;
    state.rocket_type = rocket_type.to_string();
    state.last_update_time = t0() + Duration::minutes(minutes);
    state
}

// ── Store ────────────────────────────────────────────────────────────

#[test]
fn get_unknown_id_returns_none() {
    let store = InMemoryRocketStore::new();
    assert!(store.get(&Uuid::new_v4()).is_none());
    assert!(store.is_empty());
}

#[test]
fn save_overwrites_previous_value() {
    let store = InMemoryRocketStore::new();
    let mut state = state_with_speed(500, "Falcon-9", 0);
    store.save(state.clone());

    state.speed = 3500;
    state.last_sequence = 2;
    store.save(state.clone());

    assert_eq!(store.get(&state.id), Some(state));
    assert_eq!(store.len(), 1);
}

#[test]
fn list_all_returns_each_id_once_with_latest_value() {
    let store = InMemoryRocketStore::new();
    assert!(store.list_all().is_empty());

    let states: Vec<_> = (0..5).map(|i| state_with_speed(i * 100, "Soyuz", i)).collect();
    for s in &states {
        store.save(s.clone());
    }

    let mut updated = states[0].clone();
    updated.speed = 150;
    store.save(updated.clone());

    let listed = store.list_all();
    assert_eq!(listed.len(), 5);
    let ids: HashSet<_> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 5);
    let first = listed.iter().find(|s| s.id == updated.id).unwrap();
    assert_eq!(first.speed, 150);
}

#[test]
fn concurrent_writers_and_readers_do_not_corrupt() {
    let store = Arc::new(InMemoryRocketStore::new());
    let ids: Vec<_> = (0..8).map(|_| Uuid::new_v4()).collect();

    let writers: Vec<_> = ids
        .iter()
        .map(|&id| {
            let store = store.clone();
            std::thread::spawn(move || {
                for seq in 1..=200u64 {
                    let mut state = RocketState::new(id);
                    state.speed = seq as i64;
                    state.last_sequence = seq;
                    store.save(state);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let ids = ids.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    for id in &ids {
                        if let Some(state) = store.get(id) {
                            // A whole value or nothing, never a mix.
                            assert_eq!(state.speed, state.last_sequence as i64);
                        }
                    }
                    assert!(store.list_all().len() <= ids.len());
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("thread should not panic");
    }

    assert_eq!(store.len(), ids.len());
    for id in &ids {
        assert_eq!(store.get(id).unwrap().last_sequence, 200);
    }
}

// ── Aggregation ──────────────────────────────────────────────────────

#[test]
fn launch_on_unseen_rocket_creates_state() {
    let (store, service) = service();
    let id = Uuid::new_v4();
    let ev = launched(id, 1, 1000);

    let outcome = service.process(&ev);

    let expected = RocketState {
        id,
        rocket_type: "Falcon-9".to_string(),
        speed: 1000,
        mission: "ARTEMIS".to_string(),
        status: RocketStatus::Launched,
        reason: None,
        last_update_time: ev.time,
        last_sequence: 1,
    };
    assert_eq!(
        outcome,
        ProcessOutcome::Applied {
            created: true,
            state: expected.clone()
        }
    );
    assert_eq!(store.get(&id), Some(expected));
}

#[test]
fn speed_changes_are_applied_arithmetically() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, 1000));
    service.process(&event(id, 2, EventKind::SpeedIncreased { by: 500 }));
    service.process(&event(id, 3, EventKind::SpeedDecreased { by: 200 }));

    let state = service.get(&id).unwrap();
    assert_eq!(state.speed, 1300);
    assert_eq!(state.last_sequence, 3);
}

#[test]
fn speed_may_go_negative() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, 100));
    service.process(&event(id, 2, EventKind::SpeedDecreased { by: 300 }));

    assert_eq!(service.get(&id).unwrap().speed, -200);
}

#[test]
fn extreme_speed_deltas_saturate() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, i64::MAX - 1));

    service.process(&event(id, 2, EventKind::SpeedIncreased { by: 10 }));
    assert_eq!(service.get(&id).unwrap().speed, i64::MAX);

    service.process(&event(id, 3, EventKind::SpeedDecreased { by: i64::MIN }));
    assert_eq!(service.get(&id).unwrap().speed, i64::MAX);
}

#[test]
fn speed_change_before_launch_still_applies() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    let outcome = service.process(&event(id, 1, EventKind::SpeedIncreased { by: 42 }));

    assert!(outcome.is_applied());
    let state = service.get(&id).unwrap();
    assert_eq!(state.speed, 42);
    assert_eq!(state.status, RocketStatus::Unknown);
}

#[test]
fn mission_change_replaces_mission_only() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, 700));
    service.process(&event(
        id,
        2,
        EventKind::MissionChanged {
            new_mission: "SHUTTLE_MIR".to_string(),
        },
    ));

    let state = service.get(&id).unwrap();
    assert_eq!(state.mission, "SHUTTLE_MIR");
    assert_eq!(state.speed, 700);
    assert_eq!(state.status, RocketStatus::Launched);
}

#[test]
fn explosion_zeroes_speed_and_records_reason() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, 9000));
    service.process(&event(
        id,
        2,
        EventKind::Exploded {
            reason: Some("fuel leak".to_string()),
        },
    ));

    let state = service.get(&id).unwrap();
    assert_eq!(state.speed, 0);
    assert_eq!(state.status, RocketStatus::Exploded);
    assert_eq!(state.reason.as_deref(), Some("fuel leak"));
}

#[test]
fn stale_event_leaves_state_unchanged() {
    let (store, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 5, 1000));
    let before = store.get(&id).unwrap();

    let outcome = service.process(&event(id, 3, EventKind::SpeedIncreased { by: 999 }));

    assert_eq!(outcome, ProcessOutcome::Dropped { last_sequence: 5 });
    assert_eq!(store.get(&id), Some(before));
}

#[test]
fn duplicate_event_is_idempotent() {
    let (store, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, 1000));
    let inc = event(id, 2, EventKind::SpeedIncreased { by: 250 });
    service.process(&inc);
    let once = store.get(&id).unwrap();

    let outcome = service.process(&inc);

    assert!(!outcome.is_applied());
    assert_eq!(store.get(&id), Some(once));
}

#[test]
fn last_sequence_tracks_maximum_of_applied_events() {
    let (store, service) = service();
    let id = Uuid::new_v4();
    let mut seen_max = 0;

    for seq in [3u64, 1, 7, 2, 7, 9, 4, 8] {
        let outcome = service.process(&event(id, seq, EventKind::SpeedIncreased { by: 1 }));
        let last = store.get(&id).unwrap().last_sequence;
        assert!(last >= seen_max, "last sequence must never decrease");
        seen_max = last;
        if outcome.is_applied() {
            assert_eq!(last, seq);
        }
    }

    assert_eq!(seen_max, 9);
    // Only 3, 7 and 9 were accepted.
    assert_eq!(store.get(&id).unwrap().speed, 3);
}

#[test]
fn second_event_is_not_reported_as_created() {
    let (_, service) = service();
    let id = Uuid::new_v4();

    service.process(&launched(id, 1, 10));
    match service.process(&event(id, 2, EventKind::SpeedIncreased { by: 1 })) {
        ProcessOutcome::Applied { created, .. } => assert!(!created),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

// ── Listing ──────────────────────────────────────────────────────────

fn seeded_listing() -> (RocketService, [RocketState; 3]) {
    let (store, service) = service();
    let slow = state_with_speed(100, "Beta", 1);
    let mid = state_with_speed(200, "Gamma", 2);
    let fast = state_with_speed(300, "Alpha", 3);
    for s in [&fast, &slow, &mid] {
        store.save(s.clone());
    }
    (service, [slow, mid, fast])
}

fn ids(states: &[RocketState]) -> Vec<RocketId> {
    states.iter().map(|s| s.id).collect()
}

#[test]
fn list_sorted_by_speed_desc() {
    let (service, [slow, mid, fast]) = seeded_listing();

    let listed = service.list_all("speed", "desc");

    assert_eq!(ids(&listed), vec![fast.id, mid.id, slow.id]);
}

#[test]
fn list_sorted_by_type_and_time_asc() {
    let (service, [slow, mid, fast]) = seeded_listing();

    let by_type = service.list_all("TYPE", "asc");
    assert_eq!(ids(&by_type), vec![fast.id, slow.id, mid.id]);

    let by_time = service.list_all("lastUpdateTime", "");
    assert_eq!(ids(&by_time), vec![slow.id, mid.id, fast.id]);
}

#[test]
fn list_sorted_by_id_matches_string_order() {
    let (service, states) = seeded_listing();

    let listed = service.list_all("id", "asc");

    let mut expected: Vec<String> = states.iter().map(|s| s.id.to_string()).collect();
    expected.sort();
    let got: Vec<String> = listed.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(got, expected);
}

#[test]
fn unknown_or_empty_sort_field_keeps_snapshot_order() {
    let (service, _) = seeded_listing();
    let snapshot = service.list_sorted(None, SortOrder::Asc);

    assert_eq!(ids(&service.list_all("", "desc")), ids(&snapshot));
    assert_eq!(ids(&service.list_all("altitude", "desc")), ids(&snapshot));
}

#[test]
fn non_desc_order_is_ascending() {
    let (service, [slow, mid, fast]) = seeded_listing();

    let listed = service.list_sorted(Some(SortField::Speed), SortOrder::from_lenient("sideways"));

    assert_eq!(ids(&listed), vec![slow.id, mid.id, fast.id]);
}

#[test]
fn list_on_empty_store_is_empty() {
    let (_, service) = service();
    assert!(service.list_all("speed", "asc").is_empty());
}
