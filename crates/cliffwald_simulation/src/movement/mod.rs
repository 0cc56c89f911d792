//! Movement domain — MoveIntent → Velocity динамического тела
//!
//! Содержит:
//! - MovementConfig (скорость, параметры тела)
//! - apply_move_intent (система, первая в тике)
//! - character_body / wall_body (rapier bundles для спавна)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod body;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use body::{character_body, wall_body};
pub use systems::apply_move_intent;

use crate::simulation::SimulationSet;

/// Параметры движения и тела персонажа
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Максимальная скорость (px/s): 120 базовых × 1.5 против linear damping
    pub max_speed: f32,
    /// Радиус ball collider'а персонажа
    pub body_radius: f32,
    pub linear_damping: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_speed: 180.0,
            body_radius: 20.0,
            linear_damping: 10.0,
        }
    }
}

/// Movement Plugin
///
/// Регистрирует apply_move_intent в Update (SimulationSet::Movement),
/// до AI и до rapier step (PostUpdate).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementConfig>()
            .add_systems(Update, apply_move_intent.in_set(SimulationSet::Movement));
    }
}
