//! Prestige: личные очки + очки факультетов
//!
//! ECS ответственность:
//! - Prestige (component) — личный баланс персонажа
//! - HousePoints (resource) — сумма по факультетам
//! - award_attendance — награда за присутствие на месте в начале часа
//! - calendar — учебный курс, Кубок факультетов и обнуление очков
//!
//! Anti-sabotage: remove_prestige не снимает больше личного баланса,
//! поэтому один студент не может утопить свой факультет.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::schedule::attendance_target;
use crate::components::{world_to_ground, House, Prestige, StudentSlot};
use crate::simulation::{SimClock, SimulationSet};

pub mod calendar;

pub use calendar::{
    academic_progress, advance_calendar, AcademicCalendar, AcademicProgress, CalendarConfig, HouseCupAwarded,
};

/// Параметры наград
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeConfig {
    /// Очки за присутствие на месте расписания
    pub attendance_reward: i64,
    /// Допуск до места расписания (px)
    pub attendance_radius: f32,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self {
            attendance_reward: 5,
            attendance_radius: 50.0,
        }
    }
}

/// Очки факультетов
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousePoints {
    points: BTreeMap<House, i64>,
}

impl HousePoints {
    pub fn get(&self, house: House) -> i64 {
        self.points.get(&house).copied().unwrap_or(0)
    }

    /// Очки всех факультетов (в порядке House::ALL)
    pub fn standings(&self) -> Vec<(House, i64)> {
        House::ALL.iter().map(|house| (*house, self.get(*house))).collect()
    }

    /// Лидер с отрывом; None при ничьей за первое место
    pub fn cup_winner(&self) -> Option<House> {
        let mut standings = self.standings();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        match standings.as_slice() {
            [(leader, top), (_, second), ..] if top > second => Some(*leader),
            [(leader, _)] => Some(*leader),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    fn apply(&mut self, house: House, delta: i64) {
        *self.points.entry(house).or_insert(0) += delta;
    }
}

/// Начислить prestige персонажу и его факультету
///
/// Неположительные суммы игнорируются. Возвращает начисленное.
pub fn add_prestige(
    prestige: &mut Prestige,
    house: Option<House>,
    house_points: &mut HousePoints,
    amount: i64,
) -> i64 {
    if amount <= 0 {
        return 0;
    }
    prestige.0 += amount;
    if let Some(house) = house {
        house_points.apply(house, amount);
    }
    amount
}

/// Снять prestige (anti-sabotage: не больше личного баланса)
///
/// Штрафы host'а идут через SimulationServer::deduct_prestige.
/// Возвращает фактически снятое.
pub fn remove_prestige(
    prestige: &mut Prestige,
    house: Option<House>,
    house_points: &mut HousePoints,
    amount: i64,
) -> i64 {
    let actual = amount.min(prestige.0);
    if actual <= 0 {
        return 0;
    }
    prestige.0 -= actual;
    if let Some(house) = house {
        house_points.apply(house, -actual);
    }
    actual
}

/// Последний час, за который уже наградили
///
/// None — час ещё не наблюдался (первое наблюдение наград не даёт).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastRewardedHour(pub Option<u32>);

/// Система: награда за посещаемость при смене виртуального часа
///
/// Проверяются все студенты (Echo и Possessed): место берётся из StudentSlot.
pub fn award_attendance(
    clock: Res<SimClock>,
    config: Res<PrestigeConfig>,
    mut last_hour: ResMut<LastRewardedHour>,
    mut house_points: ResMut<HousePoints>,
    mut students: Query<(&StudentSlot, &Transform, &mut Prestige)>,
) {
    let previous = last_hour.0.replace(clock.hour);
    match previous {
        Some(hour) if hour != clock.hour => {}
        _ => return,
    }

    let radius_sq = config.attendance_radius * config.attendance_radius;
    let mut rewarded = 0usize;

    for (slot, transform, mut prestige) in students.iter_mut() {
        let position = world_to_ground(transform.translation);
        let seat = attendance_target(&slot.routine, clock.hour);
        if position.distance_squared(seat) > radius_sq {
            continue;
        }
        add_prestige(&mut prestige, Some(slot.house), &mut house_points, config.attendance_reward);
        rewarded += 1;
    }

    crate::log(&format!(
        "🏅 Hour {} attendance: {} students rewarded (+{})",
        clock.hour, rewarded, config.attendance_reward
    ));
}

/// Prestige Plugin
///
/// advance_calendar → award_attendance в Update (SimulationSet::Bookkeeping),
/// до движения: проверяются позиции на начало тика.
pub struct PrestigePlugin;

impl Plugin for PrestigePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HouseCupAwarded>()
            .init_resource::<PrestigeConfig>()
            .init_resource::<CalendarConfig>()
            .init_resource::<AcademicCalendar>()
            .init_resource::<HousePoints>()
            .init_resource::<LastRewardedHour>()
            .add_systems(
                Update,
                (advance_calendar, award_attendance)
                    .chain()
                    .in_set(SimulationSet::Bookkeeping),
            );
    }
}
