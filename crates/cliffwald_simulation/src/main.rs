//! Headless симуляция Cliffwald
//!
//! Запускает SimulationServer без сети: уровень из аргумента (или пустой),
//! конфиг из второго аргумента (или по умолчанию), фиксированное число тиков.
//! Виртуальный час считается из wall-clock через game_time.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use cliffwald_simulation::{
    game_time, init_logger, log_error, log_info, InMemorySessionStore, LevelData, SimulationConfig,
    SimulationServer,
};

const TICKS: u64 = 1000;

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() {
    init_logger();
    let mut args = std::env::args().skip(1);

    let level_path = args.next();
    let config = match args.next() {
        Some(path) => SimulationConfig::load(&path).unwrap_or_else(|err| {
            log_error(&format!("Config {} rejected ({}), using defaults", path, err));
            SimulationConfig::default()
        }),
        None => SimulationConfig::default(),
    };
    let level = match level_path {
        Some(path) => LevelData::load_or_empty(path),
        None => LevelData::empty_for(&config.layout),
    };

    log_info(&format!("Starting Cliffwald headless simulation (seed: {})", config.seed));
    let tick_ms = config.tick_interval_ms();
    let mut server = SimulationServer::new(config, level, Arc::new(InMemorySessionStore::new()));

    let started = Instant::now();
    for tick in 0..TICKS {
        let hour = game_time(wall_clock_ms()).hour;
        server.tick(tick_ms, hour);

        let hits = server.drain_player_hits();
        let duels = server.drain_duel_results();
        server.drain_spell_casts();
        server.drain_evictions();
        server.drain_item_pickups();
        server.drain_house_cups();

        if tick % 100 == 0 {
            let snapshot = server.snapshot();
            log_info(&format!(
                "Tick {}: hour {:02}, {} characters, {} projectiles, {} cards, {} hits, {} duels",
                tick,
                hour,
                snapshot.entities.len(),
                snapshot.projectiles.len(),
                snapshot.items.len(),
                hits.len(),
                duels.len()
            ));
        }
    }

    log_info(&format!(
        "Simulation complete: {} ticks in {:.2?}",
        TICKS,
        started.elapsed()
    ));
}
