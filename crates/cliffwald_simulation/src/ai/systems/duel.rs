//! Дуэльное поведение: держать дистанцию, strafe, каст по таймеру

use bevy::prelude::*;

use crate::ai::components::AIConfig;

/// Знак strafe: чистая функция от (id, wall-clock)
///
/// Периодически меняется со временем, разный у соседей по id.
pub fn strafe_sign(numeric_id: u32, now_ms: f64) -> f32 {
    if (now_ms / 1000.0 + numeric_id as f64).sin() > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Решение дуэльного тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuelSteer {
    /// Нормализованное направление на противника (facing + прицел)
    pub toward: Vec2,
    /// Analog вектор движения
    pub movement: Vec2,
}

/// Дистанционная полоса: дальше `duel_far` — сближаемся, ближе `duel_near` —
/// отступаем, между — боковой strafe половинной силы
pub fn duel_steer(config: &AIConfig, numeric_id: u32, now_ms: f64, position: Vec2, opponent: Vec2) -> DuelSteer {
    let offset = opponent - position;
    let distance = offset.length();
    let toward = if distance > 0.0 {
        offset / distance
    } else {
        Vec2::ZERO
    };

    let movement = if distance > config.duel_far {
        toward
    } else if distance < config.duel_near {
        -toward
    } else {
        toward.perp() * strafe_sign(numeric_id, now_ms) * config.strafe_strength
    };

    DuelSteer { toward, movement }
}
