//! Combat system module (spell projectiles + duels)
//!
//! ECS ответственность:
//! - Casting: SpellRegistry + per-caster cooldown → Projectiles
//! - Projectiles: ручная интеграция + rapier ray cast по смещению за тик
//! - RPS: попарные столкновения снарядов (rock / paper / scissors)
//! - Duels: зона арены, счёт попаданий, победа → prestige
//!
//! Events: CastRequested (вход), SpellCast / PlayerHit / DuelWon (наружу).

use bevy::prelude::*;
use bevy_rapier3d::prelude::PhysicsSet;
use serde::{Deserialize, Serialize};

pub mod arena;
pub mod clash;
pub mod events;
pub mod projectile;
pub mod spells;
pub mod systems;


// Re-export основных типов
pub use arena::{assign_duels, DuelArena};
pub use clash::mark_clashes;
pub use events::{CastRequested, DuelWon, PlayerHit, ProjectileStruck, SpellCast};
pub use projectile::{try_cast, CastAttempt, CastCooldowns, Projectile, ProjectileId, Projectiles};
pub use spells::{resolve_clash, ClashOutcome, RpsKind, SpellConfig, SpellRegistry};

use crate::simulation::SimulationSet;

/// Параметры боя
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Запас длины луча сверх смещения за тик
    pub ray_padding: f32,
    /// Дистанция RPS столкновения
    pub clash_radius: f32,
    /// Время жизни снаряда (ms)
    pub ttl_ms: f32,
    /// Максимальная дистанция от точки каста
    pub max_range: f32,
    /// Попаданий до победы в дуэли
    pub win_score: u32,
    /// Prestige за победу
    pub win_reward: i64,
    /// Сталкиваются ли снаряды одного владельца
    pub self_clash: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            ray_padding: 10.0,
            clash_radius: 30.0,
            ttl_ms: 2000.0,
            max_range: 600.0,
            win_score: 2,
            win_reward: 20,
            self_clash: true,
        }
    }
}

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. assign_duels (Update, Ai) — до drive_echo_minds
/// 2. process_cast_requests (Update, Casting) — после AI, до rapier step
/// 3. update_projectiles → resolve_player_hits (PostUpdate, Combat) — после
///    rapier Writeback, позиции тел уже актуальны
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<CastRequested>()
            .add_event::<SpellCast>()
            .add_event::<ProjectileStruck>()
            .add_event::<PlayerHit>()
            .add_event::<DuelWon>();

        app.init_resource::<CombatConfig>()
            .init_resource::<SpellRegistry>()
            .init_resource::<Projectiles>()
            .init_resource::<CastCooldowns>()
            .init_resource::<DuelArena>();

        app.add_systems(
            Update,
            (
                assign_duels
                    .in_set(SimulationSet::Ai)
                    .before(crate::ai::systems::drive_echo_minds),
                systems::process_cast_requests.in_set(SimulationSet::Casting),
            ),
        );

        app.add_systems(
            PostUpdate,
            (systems::update_projectiles, systems::resolve_player_hits)
                .chain()
                .in_set(SimulationSet::Combat)
                .after(PhysicsSet::Writeback),
        );
    }
}
