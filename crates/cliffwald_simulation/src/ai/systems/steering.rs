//! Steering: separation от соседей

use bevy::prelude::*;

/// Ближе этого расстояния соседа не учитываем (совпадающие центры → нет направления)
const MIN_SEPARATION_DISTANCE_SQ: f32 = 0.001;

/// Сила отталкивания от соседей внутри радиуса
///
/// Линейно убывает к краю радиуса: `(radius - d) / radius * strength`.
pub fn separation_force(
    position: Vec2,
    neighbors: impl IntoIterator<Item = Vec2>,
    radius: f32,
    strength: f32,
) -> Vec2 {
    let radius_sq = radius * radius;
    let mut push = Vec2::ZERO;

    for neighbor in neighbors {
        let away = position - neighbor;
        let distance_sq = away.length_squared();
        if distance_sq < radius_sq && distance_sq > MIN_SEPARATION_DISTANCE_SQ {
            let distance = distance_sq.sqrt();
            let falloff = (radius - distance) / radius;
            push += away / distance * falloff * strength;
        }
    }

    push
}
