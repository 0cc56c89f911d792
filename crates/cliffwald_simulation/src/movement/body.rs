//! Rapier bundles для тел персонажей и стен
//!
//! Персонаж: Dynamic шар на плоскости XZ, без гравитации и вращения.
//! Стена: Fixed cuboid, высота с запасом над плоскостью лучей.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::MovementConfig;
use crate::components::{ground_to_world, WALL_HALF_HEIGHT};
use crate::level::WallRect;

/// Физическое тело персонажа
///
/// Тело живёт всю жизнь персонажа: possession меняет только компоненты
/// управления вокруг него.
pub fn character_body(position: Vec2, config: &MovementConfig) -> impl Bundle {
    (
        Transform::from_translation(ground_to_world(position)),
        RigidBody::Dynamic,
        Collider::ball(config.body_radius),
        Velocity::zero(),
        GravityScale(0.0),
        LockedAxes::ROTATION_LOCKED | LockedAxes::TRANSLATION_LOCKED_Y,
        Damping {
            linear_damping: config.linear_damping,
            angular_damping: 0.0,
        },
    )
}

/// Статическая стена из прямоугольника уровня
pub fn wall_body(wall: &WallRect) -> impl Bundle {
    let half = wall.half_extents();
    (
        Transform::from_translation(ground_to_world(wall.center())),
        RigidBody::Fixed,
        Collider::cuboid(half.x, WALL_HALF_HEIGHT, half.y),
    )
}
