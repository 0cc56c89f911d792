//! Movement компоненты: MoveIntent (input), Facing

use bevy::prelude::*;

use super::world::finite_or_zero;

/// Намерение движения (input от клиента или AI)
///
/// Либо четыре дискретных направления (клавиатура), либо analog вектор
/// (джойстик / AI steering). Ось y экрана направлена вниз: `up` = -y.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum MoveIntent {
    Discrete {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    },
    Analog(Vec2),
}

impl Default for MoveIntent {
    fn default() -> Self {
        Self::Analog(Vec2::ZERO)
    }
}

impl MoveIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn discrete(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self::Discrete {
            left,
            right,
            up,
            down,
        }
    }

    /// Anti speed-hack: analog длиннее единицы обрезается, NaN/inf → ноль
    ///
    /// Применяется на входе (apply_input) и повторно в Movement.
    pub fn sanitized(self) -> Self {
        match self {
            Self::Analog(v) => Self::Analog(clamp_analog(v)),
            discrete => discrete,
        }
    }

    /// Направление движения без учёта скорости, длина ≤ 1
    pub fn direction(&self) -> Vec2 {
        match *self {
            Self::Analog(v) => clamp_analog(v),
            Self::Discrete {
                left,
                right,
                up,
                down,
            } => {
                let mut dir = Vec2::ZERO;
                if left {
                    dir.x -= 1.0;
                }
                if right {
                    dir.x += 1.0;
                }
                if up {
                    dir.y -= 1.0;
                }
                if down {
                    dir.y += 1.0;
                }
                // Диагональ: 1/√2 на каждую ось, скорость = осевой
                if dir.x != 0.0 && dir.y != 0.0 {
                    dir *= std::f32::consts::FRAC_1_SQRT_2;
                }
                dir
            }
        }
    }
}

fn clamp_analog(v: Vec2) -> Vec2 {
    let v = finite_or_zero(v);
    if v.length_squared() > 1.0 {
        v.normalize_or_zero()
    } else {
        v
    }
}

/// Направление взгляда (анимация / прицел), не физика
///
/// По умолчанию "вниз" (к камере).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub Vec2);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec2::Y)
    }
}

impl Facing {
    pub const DOWN: Facing = Facing(Vec2::Y);
    pub const UP: Facing = Facing(Vec2::NEG_Y);
}
