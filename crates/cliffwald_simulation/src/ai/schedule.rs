//! Расписание школы по виртуальному часу
//!
//! Интервалы полуоткрытые `[start, end)`, таблица покрывает все 24 часа
//! ровно один раз: любой час даёт ровно одну активность.

use bevy::prelude::*;

use super::components::EchoMind;
use crate::components::Facing;
use crate::level::{RoamArea, SchoolLayout};

/// Golden angle (~137.5°) для спиральной дисперсии
pub const GOLDEN_ANGLE: f32 = 2.399;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoamSpot {
    TrainingGrounds,
    Courtyard,
    Forest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Sleep,
    Eat,
    Class,
    /// Свободное время: рассеяться по зоне
    Roam(RoamSpot),
}

#[derive(Debug, Clone, Copy)]
struct ScheduleEntry {
    start: u32,
    end: u32,
    activity: Activity,
}

const fn entry(start: u32, end: u32, activity: Activity) -> ScheduleEntry {
    ScheduleEntry {
        start,
        end,
        activity,
    }
}

const SCHEDULE: [ScheduleEntry; 9] = [
    entry(0, 7, Activity::Sleep),
    entry(7, 8, Activity::Eat),
    entry(8, 10, Activity::Class),
    entry(10, 12, Activity::Roam(RoamSpot::TrainingGrounds)),
    entry(12, 14, Activity::Roam(RoamSpot::Courtyard)),
    entry(14, 17, Activity::Roam(RoamSpot::Forest)),
    entry(17, 19, Activity::Class),
    entry(19, 21, Activity::Eat),
    entry(21, 24, Activity::Sleep),
];

/// Активность для часа (час берётся по модулю 24)
pub fn activity_at(hour: u32) -> Activity {
    let hour = hour % 24;
    SCHEDULE
        .iter()
        .find(|e| hour >= e.start && hour < e.end)
        .map(|e| e.activity)
        .unwrap_or(Activity::Sleep)
}

impl SchoolLayout {
    pub fn roam_area(&self, spot: RoamSpot) -> RoamArea {
        match spot {
            RoamSpot::TrainingGrounds => self.training_grounds,
            RoamSpot::Courtyard => self.courtyard,
            RoamSpot::Forest => self.forest,
        }
    }
}

/// Детерминированная точка в зоне: golden-angle спираль по numeric id
///
/// Чистая функция от id: Echo расходятся без координации и без хранения состояния.
pub fn dispersion_point(area: RoamArea, numeric_id: u32) -> Vec2 {
    let angle = numeric_id as f32 * GOLDEN_ANGLE;
    let spread = ((numeric_id + 1) as f32).sqrt() * (area.radius / 5.0);
    let radius = spread.min(area.radius);
    area.center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Куда Echo должен идти сейчас и куда смотреть по прибытии
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub point: Vec2,
    pub facing: Facing,
}

pub fn desired_destination(mind: &EchoMind, numeric_id: u32, hour: u32, layout: &SchoolLayout) -> Destination {
    let Some(spots) = mind.routine else {
        return Destination {
            point: mind.home,
            facing: Facing::DOWN,
        };
    };

    match activity_at(hour) {
        Activity::Sleep => Destination {
            point: spots.sleep,
            facing: Facing::DOWN,
        },
        Activity::Eat => Destination {
            point: spots.eat,
            facing: Facing::UP,
        },
        Activity::Class => Destination {
            point: spots.class,
            facing: Facing::UP,
        },
        Activity::Roam(spot) => Destination {
            point: dispersion_point(layout.roam_area(spot), numeric_id),
            facing: Facing::DOWN,
        },
    }
}

/// Место, за присутствие на котором в начале часа дают prestige
///
/// Свободное время проверяется по кровати (в зоне рассеяния наград нет).
pub fn attendance_target(spots: &crate::components::RoutineSpots, hour: u32) -> Vec2 {
    match activity_at(hour) {
        Activity::Eat => spots.eat,
        Activity::Class => spots.class,
        Activity::Sleep | Activity::Roam(_) => spots.sleep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{House, RoutineSpots};

    fn spots() -> RoutineSpots {
        RoutineSpots {
            sleep: Vec2::new(1.0, 1.0),
            class: Vec2::new(2.0, 2.0),
            eat: Vec2::new(3.0, 3.0),
        }
    }

    #[test]
    fn test_schedule_is_total_and_exclusive() {
        for hour in 0..24 {
            let matches = SCHEDULE
                .iter()
                .filter(|e| hour >= e.start && hour < e.end)
                .count();
            assert_eq!(matches, 1, "час {} покрыт {} раз", hour, matches);
        }
    }

    #[test]
    fn test_half_open_boundaries() {
        assert_eq!(activity_at(6), Activity::Sleep);
        assert_eq!(activity_at(7), Activity::Eat);
        assert_eq!(activity_at(8), Activity::Class);
        assert_eq!(activity_at(10), Activity::Roam(RoamSpot::TrainingGrounds));
        assert_eq!(activity_at(14), Activity::Roam(RoamSpot::Forest));
        assert_eq!(activity_at(17), Activity::Class);
        assert_eq!(activity_at(19), Activity::Eat);
        assert_eq!(activity_at(21), Activity::Sleep);
        assert_eq!(activity_at(23), Activity::Sleep);
        // За пределами суток — по модулю
        assert_eq!(activity_at(24 + 8), Activity::Class);
    }

    #[test]
    fn test_dispersion_is_deterministic_and_bounded() {
        let area = RoamArea {
            center: Vec2::new(100.0, 100.0),
            radius: 150.0,
        };
        for id in 0..64 {
            let a = dispersion_point(area, id);
            let b = dispersion_point(area, id);
            assert_eq!(a, b);
            assert!(a.distance(area.center) <= area.radius + 1e-3);
        }
        // Соседние id не совпадают
        assert_ne!(dispersion_point(area, 3), dispersion_point(area, 4));
    }

    #[test]
    fn test_destination_follows_routine() {
        let layout = SchoolLayout::default();
        let mind = EchoMind::new(Vec2::ZERO, Some(House::Axiom), Some(spots()));

        let eat = desired_destination(&mind, 5, 7, &layout);
        assert_eq!(eat.point, Vec2::new(3.0, 3.0));
        assert_eq!(eat.facing, Facing::UP);

        let sleep = desired_destination(&mind, 5, 2, &layout);
        assert_eq!(sleep.point, Vec2::new(1.0, 1.0));
        assert_eq!(sleep.facing, Facing::DOWN);

        let roam = desired_destination(&mind, 5, 12, &layout);
        assert_eq!(roam.point, dispersion_point(layout.courtyard, 5));
    }

    #[test]
    fn test_destination_without_routine_is_home() {
        let layout = SchoolLayout::default();
        let mind = EchoMind::stationary(Vec2::new(42.0, 24.0));
        for hour in [0, 9, 13, 20] {
            assert_eq!(desired_destination(&mind, 1, hour, &layout).point, Vec2::new(42.0, 24.0));
        }
    }

    #[test]
    fn test_attendance_target() {
        let s = spots();
        assert_eq!(attendance_target(&s, 7), s.eat);
        assert_eq!(attendance_target(&s, 9), s.class);
        assert_eq!(attendance_target(&s, 11), s.sleep);
        assert_eq!(attendance_target(&s, 22), s.sleep);
    }
}
