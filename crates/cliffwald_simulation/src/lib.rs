//! Cliffwald Simulation Core
//!
//! Авторитетная серверная симуляция школы магии на Bevy 0.16 + Rapier:
//! фиксированный тик, Echo AI (idle / routine / duel), grid A*,
//! снаряды с RPS столкновениями, possession Echo ⇄ игрок,
//! коллекционные карточки и учебный календарь с Кубком факультетов.
//!
//! 2D мир игры живёт на плоскости XZ физики (см. components::world).

use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_rapier3d::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod items;
pub mod level;
pub mod logger;
pub mod movement;
pub mod navigation;
pub mod possession;
pub mod prestige;
pub mod simulation;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIPlugin, AiMode, EchoMind};
pub use combat::{CastRequested, CombatConfig, CombatPlugin, DuelWon, PlayerHit, RpsKind, SpellRegistry};
pub use components::*;
pub use items::{ItemCollected, ItemConfig, ItemPlugin, WorldItemId, WorldItems};
pub use level::LevelData;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use movement::{MovementConfig, MovementPlugin};
pub use navigation::NavGrid;
pub use possession::{
    EchoEvicted, InMemorySessionStore, JoinRequest, PossessionPlugin, SessionStore, SpawnConfig,
    LEGACY_TEACHERS,
};
pub use prestige::{AcademicCalendar, CalendarConfig, HouseCupAwarded, HousePoints, PrestigePlugin};
pub use simulation::{
    game_time, EntitySnapshot, ItemSnapshot, ProjectileSnapshot, SimClock, SimulationConfig, SimulationServer,
    SimulationSet, WorldSnapshot,
};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Порядок тика:
/// - Update: Bookkeeping → Movement → Ai → Casting
/// - PostUpdate: rapier (SyncBackend → StepSimulation → Writeback) → Sync → Combat
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;

        app
            // Параметры до подсистем: init_resource внутри них их не перезапишет
            .insert_resource(config.movement.clone())
            .insert_resource(config.ai.clone())
            .insert_resource(config.combat.clone())
            .insert_resource(config.spells.clone())
            .insert_resource(config.spawn.clone())
            .insert_resource(config.layout.clone())
            .insert_resource(config.arena)
            .insert_resource(config.prestige.clone())
            .insert_resource(config.calendar.clone())
            .insert_resource(config.items.clone())
            // Детерминистичный RNG
            .insert_resource(DeterministicRng::new(config.seed))
            .init_resource::<SimClock>()
            .init_resource::<NavGrid>()
            .init_resource::<WorldSnapshot>();

        // Физика: GlobalTransform propagation + rapier в PostUpdate
        app.add_plugins((TransformPlugin, RapierPhysicsPlugin::<NoUserData>::default()))
            .insert_resource(TimestepMode::Fixed {
                dt: config.tick_interval_ms() / 1000.0,
                substeps: 1,
            });

        app.configure_sets(
            Update,
            (
                SimulationSet::Bookkeeping,
                SimulationSet::Movement,
                SimulationSet::Ai,
                SimulationSet::Casting,
            )
                .chain(),
        );
        app.configure_sets(
            PostUpdate,
            (SimulationSet::Sync, SimulationSet::Combat)
                .chain()
                .after(PhysicsSet::Writeback),
        );

        // Подсистемы
        app.add_plugins((
            MovementPlugin,
            AIPlugin,
            CombatPlugin,
            PrestigePlugin,
            ItemPlugin,
            PossessionPlugin,
        ));

        // Снимок: позиции и карточки после физики, снаряды после combat update
        app.add_systems(
            PostUpdate,
            (
                simulation::snapshot::sync_entity_snapshot.in_set(SimulationSet::Sync),
                simulation::snapshot::sync_item_snapshot.in_set(SimulationSet::Sync),
                simulation::snapshot::sync_projectile_snapshot
                    .in_set(SimulationSet::Combat)
                    .after(combat::systems::resolve_player_hits),
            ),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Тик задаёт host (SimulationServer::tick), runner не используется.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}
