//! Система: AI всех Echo за один тик
//!
//! Архитектура:
//! - Duel: держим дистанцию, раз в interval пишем CastRequested (без callback'ов)
//! - иначе Routine: расписание → путь → seek + throttled separation
//! - Possessed персонажи пропускаются (у них нет EchoMind)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::duel::duel_steer;
use super::routine::{step_routine, RoutineContext, RoutineDecision};
use super::steering::separation_force;
use crate::ai::components::AIConfig;
use crate::combat::{CastRequested, SpellRegistry};
use crate::components::{ground_to_world, world_to_ground, Character, Control, Facing, MoveIntent};
use crate::level::SchoolLayout;
use crate::movement::systems::planar_velocity;
use crate::navigation::NavGrid;
use crate::simulation::SimClock;
use crate::{log_error, DeterministicRng};

#[allow(clippy::too_many_arguments)]
pub fn drive_echo_minds(
    clock: Res<SimClock>,
    config: Res<AIConfig>,
    layout: Res<SchoolLayout>,
    nav: Res<NavGrid>,
    spells: Res<SpellRegistry>,
    mut rng: ResMut<DeterministicRng>,
    rapier_context: ReadRapierContext,
    mut casts: EventWriter<CastRequested>,
    mut echoes: Query<(
        Entity,
        &Character,
        &mut Control,
        &Transform,
        &Velocity,
        &mut MoveIntent,
        &mut Facing,
    )>,
    bodies: Query<&Transform, With<Character>>,
) {
    // Нет физического контекста (ещё не создан) — separation просто пропускается
    let rapier = rapier_context.single().ok();
    let neighborhood = Collider::ball(config.separation_radius);
    let duel_spells = spells.duel_spell_ids();
    let ctx = RoutineContext {
        config: &config,
        layout: &layout,
        nav: &nav,
        hour: clock.hour,
    };

    for (entity, character, mut control, transform, velocity, mut intent, mut facing) in echoes.iter_mut() {
        let Control::Echo(mind) = &mut *control else {
            continue;
        };

        let position = world_to_ground(transform.translation);
        if !position.is_finite() {
            log_error(&format!("AI: {:?} has non-finite position, skipping", entity));
            *intent = MoveIntent::idle();
            continue;
        }

        mind.timer_ms += clock.delta_ms;

        // 0. DUEL — routine логика полностью игнорируется
        if let Some(opponent) = mind.duel_target() {
            let opponent_pos = bodies
                .get(opponent)
                .ok()
                .map(|t| world_to_ground(t.translation))
                .filter(|p| p.is_finite());

            let Some(opponent_pos) = opponent_pos else {
                // Противник исчез
                mind.force_idle();
                *intent = MoveIntent::idle();
                continue;
            };

            let steer = duel_steer(&config, character.numeric_id, clock.now_ms, position, opponent_pos);
            *intent = MoveIntent::Analog(steer.movement);
            if steer.toward != Vec2::ZERO {
                facing.0 = steer.toward;
            }

            if mind.timer_ms > config.duel_cast_interval_ms {
                if !duel_spells.is_empty() {
                    let spell_id = duel_spells[rng.rng.gen_range(0..duel_spells.len())].clone();
                    casts.write(CastRequested {
                        caster: entity,
                        spell_id,
                        aim: steer.toward * config.duel_aim_length,
                    });
                }
                mind.timer_ms = 0.0;
            }
            continue;
        }

        // 1. ROUTINE
        let speed_sq = planar_velocity(velocity).length_squared();
        match step_routine(mind, character.numeric_id, position, speed_sq, &ctx) {
            RoutineDecision::Hold(hold_facing) => {
                *intent = MoveIntent::idle();
                *facing = hold_facing;
            }
            RoutineDecision::Pause => {
                *intent = MoveIntent::idle();
            }
            RoutineDecision::Seek(seek) => {
                let mut steer = seek;

                // 2. SEPARATION (throttled, id % period)
                if let Some(rapier) = rapier.as_ref() {
                    if config.separation_due(clock.tick, character.numeric_id) {
                        let mut neighbors = Vec::new();
                        let filter = QueryFilter::default()
                            .exclude_rigid_body(entity)
                            .exclude_sensors();
                        rapier.intersect_shape(
                            ground_to_world(position),
                            Quat::IDENTITY,
                            &*neighborhood.raw,
                            filter,
                            |other| {
                                if let Ok(other_transform) = bodies.get(other) {
                                    neighbors.push(world_to_ground(other_transform.translation));
                                }
                                true
                            },
                        );
                        steer += separation_force(
                            position,
                            neighbors,
                            config.separation_radius,
                            config.separation_strength,
                        );
                    }
                }

                *intent = MoveIntent::Analog(steer.normalize_or_zero());
            }
        }
    }
}
