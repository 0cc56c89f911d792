//! Параметры AI (все расстояния в пикселях, время в миллисекундах)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    /// Дальше этого от цели — пора идти
    pub departure_threshold: f32,
    /// Смещение цели, которое считается "новой целью"
    pub target_change_tolerance: f32,
    /// Staggered start: (id % buckets) * step
    pub stagger_buckets: u32,
    pub stagger_step_ms: f32,
    /// Waypoint считается достигнутым ближе этого
    pub waypoint_arrival_radius: f32,
    /// Separation: радиус shape-запроса и сила отталкивания
    pub separation_radius: f32,
    pub separation_strength: f32,
    /// Separation считается раз в N тиков (id % N)
    pub separation_period: u32,
    /// Stuck: speed² ниже порога дольше таймаута → пересчёт пути
    pub stuck_speed_sq: f32,
    pub stuck_timeout_ms: f32,
    /// Дуэль: дальше — сближаемся, ближе — отступаем, между — strafe
    pub duel_far: f32,
    pub duel_near: f32,
    pub strafe_strength: f32,
    pub duel_cast_interval_ms: f32,
    /// Длина aim вектора при касте (скорость задаёт заклинание)
    pub duel_aim_length: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            departure_threshold: 20.0,
            target_change_tolerance: 5.0,
            stagger_buckets: 8,
            stagger_step_ms: 500.0, // до 3.5 сек задержки
            waypoint_arrival_radius: 12.0,
            separation_radius: 24.0,
            separation_strength: 2.5,
            separation_period: 3,
            stuck_speed_sq: 25.0, // speed < 5 px/s
            stuck_timeout_ms: 2000.0,
            duel_far: 300.0,
            duel_near: 150.0,
            strafe_strength: 0.5,
            duel_cast_interval_ms: 2500.0,
            duel_aim_length: 400.0,
        }
    }
}

impl AIConfig {
    /// Задержка перед выходом к новой цели
    pub fn start_delay_ms(&self, numeric_id: u32) -> f32 {
        (numeric_id % self.stagger_buckets.max(1)) as f32 * self.stagger_step_ms
    }

    /// Тик, на котором этот персонаж считает separation
    pub fn separation_due(&self, tick: u64, numeric_id: u32) -> bool {
        let period = self.separation_period.max(1) as u64;
        tick % period == numeric_id as u64 % period
    }
}
