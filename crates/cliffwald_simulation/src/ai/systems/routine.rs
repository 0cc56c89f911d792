//! Routine поведение: расписание → цель → путь A* → seek
//!
//! Переходы:
//! - цель сменилась (сдвиг > tolerance) → Idle, ждём staggered старта
//! - Idle, далеко от цели, задержка прошла → Routine (путь строится заново)
//! - ближе departure_threshold → Idle
//! - путь не найден → Idle до следующей смены цели

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::ai::components::{AIConfig, AiMode, EchoMind};
use crate::ai::schedule::desired_destination;
use crate::components::Facing;
use crate::level::SchoolLayout;
use crate::navigation::NavGrid;

/// Что делать с input после routine шага
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoutineDecision {
    /// Стоять, смотреть в заданную сторону
    Hold(Facing),
    /// Идти в направлении (нормализованный seek к waypoint)
    Seek(Vec2),
    /// Routine, но движение на этот тик остановлено (путь сброшен)
    Pause,
}

/// Окружение routine шага (read-only ресурсы тика)
pub struct RoutineContext<'a> {
    pub config: &'a AIConfig,
    pub layout: &'a SchoolLayout,
    pub nav: &'a NavGrid,
    pub hour: u32,
}

pub fn step_routine(
    mind: &mut EchoMind,
    numeric_id: u32,
    position: Vec2,
    speed_sq: f32,
    ctx: &RoutineContext,
) -> RoutineDecision {
    let config = ctx.config;
    let destination = desired_destination(mind, numeric_id, ctx.hour, ctx.layout);
    let distance = position.distance(destination.point);

    if distance > config.departure_threshold {
        let changed = match mind.target_pos {
            None => true,
            Some(target) => {
                (target.x - destination.point.x).abs() > config.target_change_tolerance
                    || (target.y - destination.point.y).abs() > config.target_change_tolerance
            }
        };

        if changed {
            // Новая цель: стоим и ждём своей очереди
            mind.target_pos = Some(destination.point);
            mind.unreachable = false;
            mind.force_idle();
        } else if mind.mode == AiMode::Idle
            && !mind.unreachable
            && mind.timer_ms >= config.start_delay_ms(numeric_id)
        {
            mind.set_mode(AiMode::Routine);
            mind.path = None;
        }
    } else {
        mind.target_pos = Some(destination.point);
        mind.unreachable = false;
        if mind.mode != AiMode::Idle {
            mind.force_idle();
        }
    }

    if mind.mode != AiMode::Routine {
        return RoutineDecision::Hold(destination.facing);
    }

    let Some(target) = mind.target_pos else {
        mind.force_idle();
        return RoutineDecision::Hold(destination.facing);
    };

    if mind.path.is_none() {
        match ctx.nav.find_path(position, target) {
            Some(points) => mind.path = Some(finish_path(points, target)),
            None => {
                mind.unreachable = true;
                mind.force_idle();
                return RoutineDecision::Hold(destination.facing);
            }
        }
    }

    // Stuck: тело почти не двигается дольше таймаута → пересчитать путь
    if speed_sq < config.stuck_speed_sq && mind.timer_ms > config.stuck_timeout_ms {
        mind.path = None;
        mind.timer_ms = 0.0;
        return RoutineDecision::Pause;
    }

    let Some(path) = mind.path.as_mut() else {
        return RoutineDecision::Pause;
    };

    while let Some(next) = path.front() {
        if position.distance(*next) < config.waypoint_arrival_radius {
            path.pop_front();
        } else {
            break;
        }
    }

    match path.front() {
        Some(next) => RoutineDecision::Seek((*next - position).normalize_or_zero()),
        None => {
            // Путь исчерпан: следующий тик решит, прибыли или надо идти дальше
            mind.force_idle();
            RoutineDecision::Hold(destination.facing)
        }
    }
}

/// Центры тайлов + точная цель в конце (arrival threshold меньше полутайла)
fn finish_path(points: Vec<Vec2>, target: Vec2) -> VecDeque<Vec2> {
    let mut path: VecDeque<Vec2> = points.into();
    if path.back().map_or(true, |last| last.distance(target) > f32::EPSILON) {
        path.push_back(target);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{House, RoutineSpots};

    fn context<'a>(config: &'a AIConfig, layout: &'a SchoolLayout, nav: &'a NavGrid, hour: u32) -> RoutineContext<'a> {
        RoutineContext {
            config,
            layout,
            nav,
            hour,
        }
    }

    fn student_mind() -> EchoMind {
        EchoMind::new(
            Vec2::ZERO,
            Some(House::Ignis),
            Some(RoutineSpots {
                sleep: Vec2::new(100.0, 100.0),
                class: Vec2::new(600.0, 100.0),
                eat: Vec2::new(100.0, 600.0),
            }),
        )
    }

    #[test]
    fn test_arrived_holds_with_activity_facing() {
        let (config, layout, nav) = (AIConfig::default(), SchoolLayout::default(), NavGrid::default());
        let mut mind = student_mind();
        let decision = step_routine(&mut mind, 1, Vec2::new(105.0, 100.0), 0.0, &context(&config, &layout, &nav, 2));
        assert_eq!(decision, RoutineDecision::Hold(Facing::DOWN));
        assert_eq!(mind.mode, AiMode::Idle);
    }

    #[test]
    fn test_staggered_departure_then_seek() {
        let (config, layout, nav) = (AIConfig::default(), SchoolLayout::default(), NavGrid::default());
        let mut mind = student_mind();
        let position = Vec2::new(100.0, 100.0);
        let ctx = context(&config, &layout, &nav, 9); // class

        // Цель сменилась: ждём (id 2 → 1000 мс)
        assert!(matches!(step_routine(&mut mind, 2, position, 0.0, &ctx), RoutineDecision::Hold(_)));
        assert_eq!(mind.target_pos, Some(Vec2::new(600.0, 100.0)));

        mind.timer_ms += 600.0;
        assert!(matches!(step_routine(&mut mind, 2, position, 0.0, &ctx), RoutineDecision::Hold(_)));
        assert_eq!(mind.mode, AiMode::Idle);

        mind.timer_ms += 600.0;
        let decision = step_routine(&mut mind, 2, position, 0.0, &ctx);
        assert_eq!(mind.mode, AiMode::Routine);
        assert!(mind.path.is_some());
        let RoutineDecision::Seek(dir) = decision else {
            panic!("ожидался Seek, получили {:?}", decision);
        };
        assert!((dir.length() - 1.0).abs() < 1e-4);
        assert!(dir.x > 0.0);
    }

    #[test]
    fn test_unreachable_target_goes_idle_until_target_changes() {
        let (config, layout) = (AIConfig::default(), SchoolLayout::default());
        // Тайл с кроватью заблокирован
        let mut nav = NavGrid::default();
        nav.set_blocked(3, 3, true);
        let mut mind = student_mind();
        let position = Vec2::new(600.0, 100.0);
        let ctx = context(&config, &layout, &nav, 2);

        step_routine(&mut mind, 8, position, 0.0, &ctx); // новая цель, задержка 0
        step_routine(&mut mind, 8, position, 0.0, &ctx); // Routine → путь не найден
        assert_eq!(mind.mode, AiMode::Idle);
        assert!(mind.unreachable);

        mind.timer_ms = 10_000.0;
        step_routine(&mut mind, 8, position, 0.0, &ctx);
        assert_eq!(mind.mode, AiMode::Idle, "без смены цели повторных попыток нет");

        // Смена активности → новая цель → снова можно идти
        let ctx = context(&config, &layout, &nav, 9);
        step_routine(&mut mind, 8, Vec2::new(100.0, 600.0), 0.0, &ctx);
        assert!(!mind.unreachable);
    }

    #[test]
    fn test_stuck_drops_path() {
        let (config, layout, nav) = (AIConfig::default(), SchoolLayout::default(), NavGrid::default());
        let mut mind = student_mind();
        let position = Vec2::new(100.0, 100.0);
        let ctx = context(&config, &layout, &nav, 9);

        step_routine(&mut mind, 8, position, 0.0, &ctx);
        step_routine(&mut mind, 8, position, 0.0, &ctx);
        assert_eq!(mind.mode, AiMode::Routine);
        assert!(mind.path.is_some());

        mind.timer_ms = 2500.0;
        let decision = step_routine(&mut mind, 8, position, 1.0, &ctx);
        assert_eq!(decision, RoutineDecision::Pause);
        assert!(mind.path.is_none());
        assert_eq!(mind.timer_ms, 0.0);
        assert_eq!(mind.mode, AiMode::Routine);
    }

    #[test]
    fn test_path_ends_at_exact_target() {
        let path = finish_path(vec![Vec2::new(16.0, 16.0), Vec2::new(48.0, 16.0)], Vec2::new(50.0, 20.0));
        assert_eq!(path.back(), Some(&Vec2::new(50.0, 20.0)));
        assert_eq!(path.len(), 3);
    }
}
