//! AI decision-making module
//!
//! Echo FSM (idle / routine / duel), привязанный к виртуальному часу.
//! Дуэль назначается снаружи (combat::arena), AI только ведёт её.

use bevy::prelude::*;

pub mod components;
pub mod schedule;
pub mod systems;

// Re-export основных типов
pub use components::{AIConfig, AiMode, EchoMind};
pub use schedule::{activity_at, dispersion_point, Activity, RoamSpot};

use crate::simulation::SimulationSet;

/// AI Plugin
///
/// Регистрирует drive_echo_minds в Update (SimulationSet::Ai).
/// Порядок внутри тика:
/// 1. combat::arena::assign_duels — назначение противников в зоне дуэлей
/// 2. drive_echo_minds — duel / routine → MoveIntent + CastRequested
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AIConfig>().add_systems(
            Update,
            systems::drive_echo_minds.in_set(SimulationSet::Ai),
        );
    }
}
