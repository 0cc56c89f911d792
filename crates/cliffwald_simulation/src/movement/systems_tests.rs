//! Tests for movement systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy_rapier3d::prelude::*;

    use super::super::systems::{apply_move_intent, planar_velocity, velocity_from_intent};
    use super::super::MovementConfig;
    use crate::components::{Facing, MoveIntent};

    fn movement_app() -> App {
        let mut app = App::new();
        app.init_resource::<MovementConfig>()
            .add_systems(Update, apply_move_intent);
        app
    }

    fn spawn_mover(app: &mut App, intent: MoveIntent) -> Entity {
        app.world_mut()
            .spawn((intent, Facing::default(), RigidBody::Dynamic, Velocity::zero()))
            .id()
    }

    #[test]
    fn test_oversized_analog_never_exceeds_max_speed() {
        let max = MovementConfig::default().max_speed;
        for i in 0..64 {
            let angle = i as f32 * 0.37;
            let magnitude = 1.0 + i as f32 * 3.5;
            let intent = MoveIntent::Analog(Vec2::from_angle(angle) * magnitude);
            let speed = velocity_from_intent(&intent, max).length();
            assert!((speed - max).abs() < 1e-2, "magnitude {} → speed {}", magnitude, speed);
        }
    }

    #[test]
    fn test_diagonal_discrete_speed_equals_axis_speed() {
        let max = MovementConfig::default().max_speed;
        let diagonals = [
            MoveIntent::discrete(true, false, true, false),
            MoveIntent::discrete(true, false, false, true),
            MoveIntent::discrete(false, true, true, false),
            MoveIntent::discrete(false, true, false, true),
        ];
        for intent in diagonals {
            let speed = velocity_from_intent(&intent, max).length();
            assert!((speed - max).abs() < 1e-2);
        }
        let axis = velocity_from_intent(&MoveIntent::discrete(false, false, false, true), max);
        assert_eq!(axis, Vec2::new(0.0, max));
    }

    #[test]
    fn test_system_writes_velocity_on_ground_plane() {
        let mut app = movement_app();
        let entity = spawn_mover(&mut app, MoveIntent::Analog(Vec2::new(10.0, 0.0)));

        app.update();

        let velocity = app.world().get::<Velocity>(entity).unwrap();
        assert_eq!(velocity.linvel.y, 0.0);
        assert!((planar_velocity(velocity) - Vec2::new(180.0, 0.0)).length() < 1e-3);
        assert_eq!(app.world().get::<Facing>(entity).unwrap().0, Vec2::X);
    }

    #[test]
    fn test_facing_persists_at_zero_velocity() {
        let mut app = movement_app();
        let entity = spawn_mover(&mut app, MoveIntent::discrete(true, false, false, false));
        app.update();
        assert_eq!(app.world().get::<Facing>(entity).unwrap().0, Vec2::NEG_X);

        *app.world_mut().get_mut::<MoveIntent>(entity).unwrap() = MoveIntent::idle();
        app.update();

        let velocity = app.world().get::<Velocity>(entity).unwrap();
        assert_eq!(planar_velocity(velocity), Vec2::ZERO);
        assert_eq!(app.world().get::<Facing>(entity).unwrap().0, Vec2::NEG_X);
    }

    #[test]
    fn test_entities_without_body_are_skipped() {
        let mut app = movement_app();
        let entity = app
            .world_mut()
            .spawn((MoveIntent::Analog(Vec2::X), Velocity::zero()))
            .id();

        app.update();

        assert_eq!(app.world().get::<Velocity>(entity).unwrap().linvel, Vec3::ZERO);
    }
}
