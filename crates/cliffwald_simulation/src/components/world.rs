//! Ground plane: 2D координаты игры (пиксели, y вниз) ↔ 3D координаты Rapier
//!
//! Игра плоская, физика трёхмерная: точка (x, y) карты живёт в (x, 0, y).
//! Ось Y физики заблокирована (LockedAxes), гравитации нет.

use bevy::prelude::*;

/// Высота плоскости, на которой стоят все тела
pub const GROUND_HEIGHT: f32 = 0.0;

/// Полувысота статических стен (лучи и сферы персонажей всегда на y=0)
pub const WALL_HALF_HEIGHT: f32 = 32.0;

pub fn ground_to_world(point: Vec2) -> Vec3 {
    Vec3::new(point.x, GROUND_HEIGHT, point.y)
}

pub fn world_to_ground(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// Любой NaN/inf превращаем в ноль: внешний ввод не должен отравить физику
pub fn finite_or_zero(v: Vec2) -> Vec2 {
    if v.is_finite() {
        v
    } else {
        Vec2::ZERO
    }
}
