//! Tests for AI components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::config::AIConfig;
    use super::super::mind::{AiMode, EchoMind};

    #[test]
    fn test_echo_mind_starts_idle() {
        let mind = EchoMind::stationary(Vec2::new(10.0, 10.0));
        assert_eq!(mind.mode, AiMode::Idle);
        assert_eq!(mind.timer_ms, 0.0);
        assert!(mind.routine.is_none());
        assert!(mind.duel_target().is_none());
    }

    #[test]
    fn test_enter_duel_and_force_idle() {
        let mut mind = EchoMind::stationary(Vec2::ZERO);
        let opponent = Entity::from_raw(7);
        mind.timer_ms = 900.0;
        mind.path = Some([Vec2::ONE].into_iter().collect());
        mind.target_pos = Some(Vec2::new(5.0, 5.0));

        mind.enter_duel(opponent);
        assert_eq!(mind.duel_target(), Some(opponent));
        assert_eq!(mind.timer_ms, 0.0);
        assert!(mind.path.is_none());

        mind.timer_ms = 100.0;
        mind.force_idle();
        assert_eq!(mind.mode, AiMode::Idle);
        assert!(mind.duel_target().is_none());
        assert_eq!(mind.timer_ms, 0.0);
        // Цель расписания переживает принудительный idle
        assert_eq!(mind.target_pos, Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_ai_config_default() {
        let config = AIConfig::default();
        assert_eq!(config.departure_threshold, 20.0);
        assert_eq!(config.duel_far, 300.0);
        assert_eq!(config.duel_near, 150.0);
        assert_eq!(config.duel_cast_interval_ms, 2500.0);
    }

    #[test]
    fn test_staggered_start_delay() {
        let config = AIConfig::default();
        assert_eq!(config.start_delay_ms(8), 0.0);
        assert_eq!(config.start_delay_ms(1), 500.0);
        assert_eq!(config.start_delay_ms(15), 3500.0);
    }

    #[test]
    fn test_separation_throttle_staggered_by_id() {
        let config = AIConfig::default();
        for id in 0..9u32 {
            let due: Vec<u64> = (0..9u64).filter(|t| config.separation_due(*t, id)).collect();
            assert_eq!(due.len(), 3, "каждый третий тик");
            assert!(due.iter().all(|t| t % 3 == (id % 3) as u64));
        }
    }
}
