//! School life integration tests
//!
//! Карточки, штрафы и учебный календарь через SimulationServer:
//! - стартовые карточки попадают в снимок
//! - подбор: новая карточка → inventory, дубликат → prestige факультету
//! - deduct_prestige не снимает больше личного баланса
//! - выпуск курса: Кубок лидеру, очки факультетов обнуляются

use std::sync::Arc;

use bevy::prelude::*;
use cliffwald_simulation::*;

const TICK_MS: f32 = 1000.0 / 30.0;
const NIGHT_HOUR: u32 = 3;
const CORNER: Vec2 = Vec2::new(1000.0, 2200.0);

fn server_with(config: SimulationConfig) -> SimulationServer {
    SimulationServer::new(config, LevelData::empty(), Arc::new(InMemorySessionStore::new()))
}

#[derive(Default)]
struct Outcome {
    pickups: Vec<ItemCollected>,
    cups: Vec<HouseCupAwarded>,
}

fn run(server: &mut SimulationServer, ticks: usize, delta_ms: f32, outcome: &mut Outcome) {
    for _ in 0..ticks {
        server.tick(delta_ms, NIGHT_HOUR);
        server.drain_player_hits();
        server.drain_duel_results();
        server.drain_spell_casts();
        outcome.pickups.extend(server.drain_item_pickups());
        outcome.cups.extend(server.drain_house_cups());
    }
}

/// Игрок Axiom в пустом углу карты
fn player(server: &mut SimulationServer) -> Entity {
    let body = server
        .join(JoinRequest::new("sess_a", "alice", "Alice").with_house(House::Axiom))
        .unwrap();
    server
        .world_mut()
        .get_mut::<Transform>(body)
        .unwrap()
        .translation = ground_to_world(CORNER);
    body
}

fn drop_card(server: &mut SimulationServer, card_id: u32, position: Vec2) -> WorldItemId {
    server.world_mut().resource_mut::<WorldItems>().spawn(card_id, position)
}

#[test]
fn test_initial_cards_in_snapshot() {
    let mut server = server_with(SimulationConfig::default());
    let mut outcome = Outcome::default();
    run(&mut server, 1, TICK_MS, &mut outcome);

    let snapshot = server.snapshot();
    assert_eq!(snapshot.items.len(), 5);
    assert_eq!(server.items().len(), 5);
    for (id, item) in server.items().iter() {
        let seen = snapshot.item(id).unwrap();
        assert_eq!(seen.card_id, item.card_id);
        assert!((1..=16).contains(&seen.card_id));
    }
}

#[test]
fn test_collect_new_card_then_duplicate() {
    let mut server = server_with(SimulationConfig::default());
    let body = player(&mut server);
    let mut outcome = Outcome::default();
    run(&mut server, 1, TICK_MS, &mut outcome);

    let first = drop_card(&mut server, 12, CORNER + Vec2::new(20.0, 0.0));
    assert!(server.collect_item("sess_a", first));
    run(&mut server, 1, TICK_MS, &mut outcome);

    assert_eq!(outcome.pickups.len(), 1);
    assert_eq!(outcome.pickups[0].collector, body);
    assert_eq!(outcome.pickups[0].card_id, 12);
    assert!(!outcome.pickups[0].duplicate);
    assert!(server.snapshot().item(first).is_none());
    let inventory = server.world().get::<Inventory>(body).unwrap();
    assert!(inventory.0.iter().any(|item| item.item_id == "card_12"));

    let second = drop_card(&mut server, 12, CORNER + Vec2::new(0.0, 30.0));
    assert!(server.collect_item("sess_a", second));
    run(&mut server, 1, TICK_MS, &mut outcome);

    assert_eq!(outcome.pickups.len(), 2);
    assert!(outcome.pickups[1].duplicate);
    assert_eq!(outcome.pickups[1].reward, 5);
    assert_eq!(server.world().get::<Prestige>(body).unwrap().0, 5);
    assert_eq!(server.house_points().get(House::Axiom), 5);
}

#[test]
fn test_far_card_and_echo_session_are_ignored() {
    let mut server = server_with(SimulationConfig::default());
    player(&mut server);
    let mut outcome = Outcome::default();
    run(&mut server, 1, TICK_MS, &mut outcome);

    let far = drop_card(&mut server, 3, CORNER + Vec2::new(200.0, 0.0));
    // Echo слот нельзя дёргать по его slot id
    assert!(!server.collect_item("student_vesper_2", far));
    assert!(!server.collect_item("nobody", far));
    assert!(server.collect_item("sess_a", far));
    run(&mut server, 1, TICK_MS, &mut outcome);

    assert!(outcome.pickups.is_empty());
    assert!(server.snapshot().item(far).is_some());
}

#[test]
fn test_deduct_prestige_capped_by_balance() {
    let mut server = server_with(SimulationConfig::default());
    player(&mut server);
    let mut outcome = Outcome::default();
    run(&mut server, 1, TICK_MS, &mut outcome);

    // +5 за дубликат
    for _ in 0..2 {
        let card = drop_card(&mut server, 4, CORNER);
        assert!(server.collect_item("sess_a", card));
        run(&mut server, 1, TICK_MS, &mut outcome);
    }
    assert_eq!(server.house_points().get(House::Axiom), 5);

    assert_eq!(server.deduct_prestige("sess_a", 20), Some(5));
    assert_eq!(server.house_points().get(House::Axiom), 0);
    assert_eq!(server.deduct_prestige("sess_a", 20), Some(0));
    assert_eq!(server.deduct_prestige("student_ignis_2", 20), None);
    assert_eq!(server.deduct_prestige("nobody", 20), None);
}

#[test]
fn test_graduation_awards_house_cup() {
    let mut config = SimulationConfig::default();
    // Курс длится 8 секунд
    config.calendar.ms_per_week = 1000.0;
    let mut server = server_with(config);
    player(&mut server);
    let mut outcome = Outcome::default();
    run(&mut server, 1, TICK_MS, &mut outcome);
    assert_eq!(server.calendar().course, 1);

    for _ in 0..2 {
        let card = drop_card(&mut server, 9, CORNER);
        assert!(server.collect_item("sess_a", card));
        run(&mut server, 1, TICK_MS, &mut outcome);
    }
    assert_eq!(server.house_points().get(House::Axiom), 5);

    run(&mut server, 20, 500.0, &mut outcome);

    assert_eq!(outcome.cups.len(), 1);
    assert_eq!(outcome.cups[0].course, 1);
    assert_eq!(outcome.cups[0].winner, Some(House::Axiom));
    assert_eq!(server.calendar().course, 2);
    assert_eq!(server.house_points().get(House::Axiom), 0);
}
