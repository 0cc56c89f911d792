//! Possession integration tests
//!
//! Join / Leave через SimulationServer поверх живого App:
//! - тело остаётся тем же, меняется только Control
//! - сбой хранилища не роняет симуляцию
//! - сохранение на Leave доходит до хранилища (fire-and-forget)
//! - вытеснение старых Echo при лимите ростера

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use cliffwald_simulation::possession::{PersistenceError, SessionRecord, SessionSave};
use cliffwald_simulation::*;

const TICK_MS: f32 = 1000.0 / 30.0;

/// Хранилище, которое всегда недоступно
struct OfflineStore;

impl SessionStore for OfflineStore {
    fn load_session(&self, _account_key: &str) -> Result<SessionRecord, PersistenceError> {
        Err(PersistenceError::Unavailable("connection refused".into()))
    }

    fn save_session(&self, _save: SessionSave) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("connection refused".into()))
    }
}

fn run(server: &mut SimulationServer, ticks: usize) {
    for _ in 0..ticks {
        server.tick(TICK_MS, 3);
        server.drain_player_hits();
        server.drain_duel_results();
        server.drain_spell_casts();
    }
}

#[test]
fn test_join_and_leave_through_server() {
    let mut server = SimulationServer::new(
        SimulationConfig::default(),
        LevelData::empty(),
        Arc::new(InMemorySessionStore::new()),
    );
    run(&mut server, 2);

    let slot_snapshot = server.snapshot().entity("student_ignis_1").unwrap().clone();
    let body = server.join(JoinRequest::new("sess_a", "alice", "Alice")).unwrap();
    assert_eq!(server.entity_for_session("sess_a"), Some(body));
    assert_eq!(server.entity_for_session("student_ignis_1"), None);

    run(&mut server, 1);
    let player = server.snapshot().entity("sess_a").unwrap();
    assert!(player.possessed);
    assert_eq!(player.display_name, "Alice");
    assert_eq!(player.numeric_id, slot_snapshot.numeric_id);
    assert!(server.snapshot().entity("student_ignis_1").is_none());

    assert!(server.leave("sess_a"));
    assert!(!server.leave("sess_a"), "повторный leave — no-op");
    assert_eq!(server.entity_for_session("student_ignis_1"), Some(body));

    run(&mut server, 1);
    let echo = server.snapshot().entity("student_ignis_1").unwrap();
    assert!(!echo.possessed);
    assert_eq!(echo.display_name, slot_snapshot.display_name);
    assert_eq!(echo.skin, slot_snapshot.skin);
    assert!(server.snapshot().entity("sess_a").is_none());
}

#[test]
fn test_input_ignored_for_unknown_or_echo_session() {
    let mut server = SimulationServer::new(
        SimulationConfig::default(),
        LevelData::empty(),
        Arc::new(InMemorySessionStore::new()),
    );

    let intent = MoveIntent::discrete(true, false, false, false);
    assert!(!server.apply_input("nobody", intent));
    assert!(!server.apply_input("student_vesper_2", intent));

    server.join(JoinRequest::new("sess_a", "alice", "Alice")).unwrap();
    assert!(server.apply_input("sess_a", intent));
}

#[test]
fn test_offline_store_is_not_fatal() {
    let mut server = SimulationServer::new(
        SimulationConfig::default(),
        LevelData::empty(),
        Arc::new(OfflineStore),
    );

    let body = server.join(JoinRequest::new("sess_a", "alice", "Alice")).unwrap();
    assert_eq!(server.world().get::<Prestige>(body).unwrap().0, 0);
    run(&mut server, 3);

    assert!(server.leave("sess_a"));
    run(&mut server, 3);
    assert!(server.snapshot().entity("student_ignis_1").is_some());
}

#[test]
fn test_leave_saves_session_in_background() {
    let store = Arc::new(InMemorySessionStore::new());
    store
        .insert(
            "alice",
            SessionRecord {
                prestige: 42,
                ..Default::default()
            },
        )
        .unwrap();

    let mut server = SimulationServer::new(SimulationConfig::default(), LevelData::empty(), store.clone());
    let body = server.join(JoinRequest::new("sess_a", "alice", "Alice")).unwrap();
    assert_eq!(server.world().get::<Prestige>(body).unwrap().0, 42);
    server.world_mut().get_mut::<Prestige>(body).unwrap().0 = 57;

    run(&mut server, 5);
    assert!(server.leave("sess_a"));

    // Сохранение идёт на IoTaskPool: ждём, не блокируя тик
    let mut saved = None;
    for _ in 0..200 {
        run(&mut server, 1);
        saved = store.get("alice").filter(|record| record.prestige == 57);
        if saved.is_some() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let saved = saved.expect("сохранение так и не дошло до хранилища");
    let position = saved.position.unwrap();
    assert!(position.is_finite());
}

#[test]
fn test_evictions_are_drained_by_host() {
    let mut config = SimulationConfig::default();
    config.spawn.max_echoes = 20;
    let mut server = SimulationServer::new(config, LevelData::empty(), Arc::new(InMemorySessionStore::new()));

    // 24 студента, после join в ростере 23
    server.join(JoinRequest::new("sess_a", "alice", "Alice")).unwrap();
    run(&mut server, 1);
    assert!(server.drain_evictions().is_empty());

    // На leave ростер ужимается до 19, затем тело Alice становится 20-м
    assert!(server.leave("sess_a"));
    let evicted: Vec<String> = server.drain_evictions().into_iter().map(|e| e.key).collect();
    assert_eq!(
        evicted,
        vec![
            "student_ignis_2",
            "student_ignis_3",
            "student_ignis_4",
            "student_ignis_5",
        ]
    );

    run(&mut server, 1);
    let snapshot = server.snapshot();
    assert!(snapshot.entity("student_ignis_2").is_none());
    assert!(snapshot.entity("student_ignis_1").is_some());
    // 24 - 4 студента + 5 преподавателей
    assert_eq!(snapshot.entities.len(), 25);
}
