//! Часы симуляции и виртуальный день школы
//!
//! SimClock накапливается из измеренного host'ом wall-clock delta,
//! поэтому cooldown'ы и дуэльные таймеры не зависят от частоты тиков.

use bevy::prelude::*;

/// Время текущего тика
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    /// Суммарное время симуляции (ms)
    pub now_ms: f64,
    /// Длительность текущего тика (ms)
    pub delta_ms: f32,
    /// Виртуальный час (0..24), задаётся host'ом
    pub hour: u32,
    /// Номер тика (с 1 после первого advance)
    pub tick: u64,
}

impl SimClock {
    /// Продвинуть часы на один тик
    ///
    /// Отрицательный / NaN delta считается нулевым, час берётся по модулю 24.
    pub fn advance(&mut self, delta_ms: f32, hour: u32) {
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        self.delta_ms = delta_ms;
        self.now_ms += delta_ms as f64;
        self.hour = hour % 24;
        self.tick += 1;
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta_ms / 1000.0
    }
}

/// Длина полного виртуального дня в реальном времени (1 час)
pub const DAY_CYCLE_MS: u64 = 3_600_000;
/// Дневная фаза 06:00–22:00 занимает 45 реальных минут
pub const DAY_PHASE_MS: u64 = 2_700_000;

/// Виртуальное время суток
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTime {
    pub hour: u32,
    pub minute: u32,
    pub is_night: bool,
}

/// Перевести wall-clock timestamp (ms) в виртуальное время
///
/// День: 45 мин → 16 игровых часов. Ночь: 15 мин → 8 игровых часов.
pub fn game_time(timestamp_ms: u64) -> GameTime {
    let cycle_pos = timestamp_ms % DAY_CYCLE_MS;

    let (start_minutes, span_minutes, progress, is_night) = if cycle_pos < DAY_PHASE_MS {
        (6.0 * 60.0, 16.0 * 60.0, cycle_pos as f64 / DAY_PHASE_MS as f64, false)
    } else {
        let night_len = (DAY_CYCLE_MS - DAY_PHASE_MS) as f64;
        (
            22.0 * 60.0,
            8.0 * 60.0,
            (cycle_pos - DAY_PHASE_MS) as f64 / night_len,
            true,
        )
    };

    let total_minutes = (start_minutes + progress * span_minutes).floor() as u32;
    GameTime {
        hour: (total_minutes / 60) % 24,
        minute: total_minutes % 60,
        is_night,
    }
}
