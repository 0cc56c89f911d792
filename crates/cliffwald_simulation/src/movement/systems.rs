//! Movement системы

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::MovementConfig;
use crate::components::{ground_to_world, world_to_ground, Facing, MoveIntent};

/// Ниже этой скорости Facing не трогаем (последний взгляд сохраняется)
const FACING_EPSILON: f32 = 0.001;

/// Скорость из намерения: направление (≤ 1) × max_speed
///
/// Analog длиннее единицы обрезается (anti speed-hack), диагональ
/// дискретного ввода нормализуется до осевой скорости.
pub fn velocity_from_intent(intent: &MoveIntent, max_speed: f32) -> Vec2 {
    intent.direction() * max_speed
}

/// Система: MoveIntent → Velocity.linvel + Facing
///
/// Работает для всех тел с MoveIntent (игроки и Echo одинаково).
/// Entity без rapier тела сюда не попадают.
pub fn apply_move_intent(
    config: Res<MovementConfig>,
    mut query: Query<(&MoveIntent, &mut Velocity, Option<&mut Facing>), With<RigidBody>>,
) {
    for (intent, mut velocity, facing) in query.iter_mut() {
        let planar = velocity_from_intent(intent, config.max_speed);

        // Y не трогаем (ось заблокирована), только плоскость XZ
        let current_y = velocity.linvel.y;
        velocity.linvel = ground_to_world(planar) + Vec3::Y * current_y;

        if let Some(mut facing) = facing {
            let speed = planar.length();
            if speed > FACING_EPSILON {
                facing.0 = planar / speed;
            }
        }
    }
}

/// Плоская скорость тела (для stuck detection и snapshot'ов)
pub fn planar_velocity(velocity: &Velocity) -> Vec2 {
    world_to_ground(velocity.linvel)
}
