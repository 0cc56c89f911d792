//! Учебный календарь: курсы по 8 недель, Кубок факультетов
//!
//! Время календаря: SimClock::now_ms с запуска сервера. Неделя по умолчанию
//! равна реальной неделе, курс = 8 недель (ноябрь..июнь).
//! На переходе к следующему курсу факультет-лидер получает Кубок,
//! очки всех факультетов обнуляются.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::HousePoints;
use crate::components::House;
use crate::simulation::SimClock;

/// Месяцы учебного курса (по неделе внутри курса)
pub const MONTHS: [&str; 8] = [
    "November", "December", "January", "February", "March", "April", "May", "June",
];

#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Длина учебной недели (ms)
    pub ms_per_week: f64,
    /// Недель в курсе
    pub weeks_per_course: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            ms_per_week: 7.0 * 24.0 * 3600.0 * 1000.0,
            weeks_per_course: 8,
        }
    }
}

/// Положение в учебном году
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcademicProgress {
    /// Курс, с 1
    pub course: u32,
    /// Неделя внутри курса, с 1
    pub week: u32,
    pub month: &'static str,
}

/// Курс, неделя и месяц для времени с начала симуляции
///
/// Отрицательное время и некорректная длина недели дают первую неделю.
pub fn academic_progress(elapsed_ms: f64, config: &CalendarConfig) -> AcademicProgress {
    let weeks_per_course = config.weeks_per_course.max(1);
    let total_weeks = if config.ms_per_week.is_finite() && config.ms_per_week > 0.0 && elapsed_ms.is_finite() {
        (elapsed_ms.max(0.0) / config.ms_per_week).floor().min(u32::MAX as f64) as u32
    } else {
        0
    };

    let week_index = total_weeks % weeks_per_course;
    AcademicProgress {
        course: total_weeks / weeks_per_course + 1,
        week: week_index + 1,
        month: MONTHS[week_index as usize % MONTHS.len()],
    }
}

/// Текущий курс и месяц (для отслеживания переходов)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcademicCalendar {
    pub course: u32,
    pub month: Option<&'static str>,
}

impl Default for AcademicCalendar {
    fn default() -> Self {
        Self { course: 1, month: None }
    }
}

/// Event: курс завершён, Кубок вручён (наружу, сообщение директора)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HouseCupAwarded {
    /// Завершённый курс
    pub course: u32,
    /// None: ничья за первое место
    pub winner: Option<House>,
    /// Очки факультетов до обнуления
    pub standings: Vec<(House, i64)>,
}

/// Система: смена месяца и выпуск курса
///
/// Выполняется до award_attendance: награды часа, совпавшего с выпуском,
/// идут уже в новый курс.
pub fn advance_calendar(
    clock: Res<SimClock>,
    config: Res<CalendarConfig>,
    mut calendar: ResMut<AcademicCalendar>,
    mut house_points: ResMut<HousePoints>,
    mut cups: EventWriter<HouseCupAwarded>,
) {
    let progress = academic_progress(clock.now_ms, &config);

    if calendar.month != Some(progress.month) {
        calendar.month = Some(progress.month);
        crate::log(&format!(
            "📅 Course {}, week {}: {}",
            progress.course, progress.week, progress.month
        ));
    }

    if calendar.course >= progress.course {
        return;
    }

    let winner = house_points.cup_winner();
    let standings = house_points.standings();
    match winner {
        Some(house) => crate::log(&format!(
            "🏆 Graduation of course {}: {} wins the House Cup with {} points",
            calendar.course,
            house.title(),
            house_points.get(house)
        )),
        None => crate::log(&format!("🏆 Graduation of course {}: the House Cup is tied", calendar.course)),
    }

    cups.write(HouseCupAwarded {
        course: calendar.course,
        winner,
        standings,
    });
    house_points.reset();
    calendar.course = progress.course;
}
