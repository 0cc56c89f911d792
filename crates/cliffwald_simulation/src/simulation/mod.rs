//! Simulation loop: порядок систем, часы, снимки, host API
//!
//! Один тик = один `App::update()`:
//! 1. Update: Bookkeeping → Movement → Ai → Casting
//! 2. PostUpdate: rapier SyncBackend → StepSimulation → Writeback
//! 3. PostUpdate после Writeback: Sync → Combat

use bevy::prelude::*;

pub mod clock;
pub mod config;
pub mod server;
pub mod snapshot;

pub use clock::{game_time, GameTime, SimClock};
pub use config::{ConfigError, SimulationConfig};
pub use server::SimulationServer;
pub use snapshot::{EntitySnapshot, ItemSnapshot, ProjectileSnapshot, WorldSnapshot};

/// Фазы тика (цепочки внутри Update и PostUpdate)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Служебное: календарь, награды за час, карточки, ремонт инвариантов
    Bookkeeping,
    /// MoveIntent → Velocity
    Movement,
    /// Арена + Echo FSM
    Ai,
    /// CastRequested → снаряды, CollectRequested → карточки
    Casting,
    /// Физика → снимок позиций
    Sync,
    /// Снаряды, попадания, дуэли
    Combat,
}
