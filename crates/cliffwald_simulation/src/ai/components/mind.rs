//! EchoMind: состояние AI одного Echo (idle / routine / duel)

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::components::{House, RoutineSpots};

/// Режим AI FSM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiMode {
    /// Стоит на месте (прибыл / ждёт staggered старта / нет пути)
    #[default]
    Idle,
    /// Идёт к цели расписания по пути A*
    Routine,
    /// Дуэль с назначенным противником (вход только извне, см. arena)
    Duel { target: Entity },
}

/// AI состояние Echo
///
/// Живёт внутри `Control::Echo`, поэтому у Possessed персонажа его нет
/// физически (не просто "выключено").
#[derive(Debug, Clone, PartialEq)]
pub struct EchoMind {
    pub mode: AiMode,
    /// Миллисекунды с последнего перехода
    pub timer_ms: f32,
    /// Точка по умолчанию (для персонажей без расписания)
    pub home: Vec2,
    pub house: Option<House>,
    pub routine: Option<RoutineSpots>,
    /// Кэш пути (waypoints front → back)
    pub path: Option<VecDeque<Vec2>>,
    /// Текущая цель расписания
    pub target_pos: Option<Vec2>,
    /// Путь к target_pos не найден: ждём смены цели
    pub unreachable: bool,
}

impl EchoMind {
    pub fn new(home: Vec2, house: Option<House>, routine: Option<RoutineSpots>) -> Self {
        Self {
            mode: AiMode::Idle,
            timer_ms: 0.0,
            home,
            house,
            routine,
            path: None,
            target_pos: None,
            unreachable: false,
        }
    }

    /// Статичный NPC (преподаватель): стоит дома, расписания нет
    pub fn stationary(home: Vec2) -> Self {
        Self::new(home, None, None)
    }

    /// Переход с обнулением таймера
    pub fn set_mode(&mut self, mode: AiMode) {
        self.mode = mode;
        self.timer_ms = 0.0;
    }

    /// Принудительный idle: дуэль/путь сбрасываются, цель расписания остаётся
    pub fn force_idle(&mut self) {
        self.set_mode(AiMode::Idle);
        self.path = None;
    }

    pub fn enter_duel(&mut self, target: Entity) {
        self.set_mode(AiMode::Duel { target });
        self.path = None;
    }

    pub fn duel_target(&self) -> Option<Entity> {
        match self.mode {
            AiMode::Duel { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_dueling(&self) -> bool {
        matches!(self.mode, AiMode::Duel { .. })
    }
}
