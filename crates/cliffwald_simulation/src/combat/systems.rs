//! Combat systems: каст → снаряды → попадания → дуэльный счёт
//!
//! Порядок выполнения:
//! 1. process_cast_requests (Update, Casting) — валидация + спавн снаряда
//! 2. update_projectiles (PostUpdate, Combat) — движение, ray cast, TTL, RPS
//! 3. resolve_player_hits (PostUpdate, Combat) — счёт, победа, prestige

use std::collections::BTreeSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::clash::mark_clashes;
use super::events::{CastRequested, DuelWon, PlayerHit, ProjectileStruck, SpellCast};
use super::projectile::{try_cast, CastAttempt, CastCooldowns, Projectiles};
use super::spells::SpellRegistry;
use super::CombatConfig;
use crate::components::{
    ground_to_world, world_to_ground, Character, Control, DuelStanding, Prestige, SessionTag,
    StudentSlot,
};
use crate::prestige::{add_prestige, HousePoints};
use crate::simulation::SimClock;

/// Система: обработка CastRequested (AI + клиенты)
///
/// Отклонённые запросы (неизвестный spell, cooldown, нет кастера) молча
/// отбрасываются, наружу уходит только SpellCast для принятых.
pub fn process_cast_requests(
    clock: Res<SimClock>,
    config: Res<CombatConfig>,
    registry: Res<SpellRegistry>,
    mut cooldowns: ResMut<CastCooldowns>,
    mut projectiles: ResMut<Projectiles>,
    mut requests: EventReader<CastRequested>,
    mut casts: EventWriter<SpellCast>,
    casters: Query<(&Transform, &SessionTag), With<Character>>,
) {
    for request in requests.read() {
        let Ok((transform, tag)) = casters.get(request.caster) else {
            continue;
        };

        let attempt = CastAttempt {
            caster: request.caster,
            owner_key: tag.as_str(),
            origin: world_to_ground(transform.translation),
            spell_id: &request.spell_id,
            aim: request.aim,
            now_ms: clock.now_ms,
            max_range: config.max_range,
        };

        let Some(projectile) = try_cast(&registry, &mut cooldowns, &mut projectiles, attempt) else {
            continue;
        };

        let Some(kind) = projectiles.get(projectile).map(|p| p.kind) else {
            continue;
        };

        casts.write(SpellCast {
            projectile,
            caster: request.caster,
            spell_id: request.spell_id.clone(),
            kind,
        });
    }
}

/// Система: движение снарядов, попадания, истечение и RPS столкновения
///
/// Снаряды помечаются в BTreeSet и удаляются одним проходом в конце.
pub fn update_projectiles(
    clock: Res<SimClock>,
    config: Res<CombatConfig>,
    mut projectiles: ResMut<Projectiles>,
    rapier_context: ReadRapierContext,
    tags: Query<&SessionTag>,
    mut struck: EventWriter<ProjectileStruck>,
) {
    if projectiles.is_empty() {
        return;
    }

    let rapier = rapier_context.single().ok();
    let dt = clock.delta_secs();
    let mut doomed = BTreeSet::new();

    // 1. Integrate & hit-test
    for (id, projectile) in projectiles.iter_mut() {
        let start = projectile.position;
        let displacement = projectile.velocity * dt;
        projectile.position += displacement;

        if projectile.age_ms(clock.now_ms) > config.ttl_ms as f64
            || projectile.traveled() > projectile.max_range
        {
            doomed.insert(id);
            continue;
        }

        let (Some(rapier), Some(direction)) = (rapier.as_ref(), displacement.try_normalize()) else {
            continue;
        };

        let filter = QueryFilter::default()
            .exclude_rigid_body(projectile.owner)
            .exclude_sensors();
        let Some((victim, _toi)) = rapier.cast_ray(
            ground_to_world(start),
            Vec3::new(direction.x, 0.0, direction.y),
            displacement.length() + config.ray_padding,
            true,
            filter,
        ) else {
            continue;
        };

        // Стена (нет SessionTag) снаряд не останавливает
        let Ok(victim_tag) = tags.get(victim) else {
            continue;
        };
        if victim_tag.as_str() == projectile.owner_key {
            continue;
        }

        struck.write(ProjectileStruck {
            projectile: id,
            owner: projectile.owner,
            owner_key: projectile.owner_key.clone(),
            victim,
            spell_id: projectile.spell_id.clone(),
        });
        doomed.insert(id);
    }

    // 2. Pairwise RPS clash (уже помеченные не участвуют)
    mark_clashes(&projectiles, &mut doomed, config.clash_radius, config.self_clash);

    // 3. Single-pass removal
    projectiles.remove_all(&doomed);
}

/// Система: разрешение попаданий
///
/// Каждое попадание → PlayerHit наружу. Счёт атакующего +1; на пороге
/// победы счёт обоих обнуляется, оба Echo уходят в Idle, победитель
/// получает prestige.
pub fn resolve_player_hits(
    config: Res<CombatConfig>,
    mut house_points: ResMut<HousePoints>,
    mut struck: EventReader<ProjectileStruck>,
    mut hits: EventWriter<PlayerHit>,
    mut duels: EventWriter<DuelWon>,
    tags: Query<&SessionTag>,
    mut fighters: Query<(
        &mut DuelStanding,
        &mut Control,
        &mut Prestige,
        Option<&StudentSlot>,
    )>,
) {
    for hit in struck.read() {
        let Ok(victim_tag) = tags.get(hit.victim) else {
            continue;
        };

        hits.write(PlayerHit {
            projectile: hit.projectile,
            attacker_key: hit.owner_key.clone(),
            victim: hit.victim,
            victim_key: victim_tag.0.clone(),
            spell_id: hit.spell_id.clone(),
        });

        // Атакующий мог быть вытеснен (evicted), пока снаряд летел
        let won = {
            let Ok((mut standing, mut control, mut prestige, slot)) = fighters.get_mut(hit.owner) else {
                continue;
            };
            standing.score += 1;
            crate::log(&format!(
                "🎯 {} hit {} with {} (score {})",
                hit.owner_key, victim_tag.0, hit.spell_id, standing.score
            ));

            if standing.score < config.win_score {
                false
            } else {
                standing.reset_score();
                if let Some(mind) = control.mind_mut() {
                    mind.force_idle();
                }
                add_prestige(
                    &mut prestige,
                    slot.map(|s| s.house),
                    &mut house_points,
                    config.win_reward,
                );
                true
            }
        };

        if !won {
            continue;
        }

        if let Ok((mut standing, mut control, _, _)) = fighters.get_mut(hit.victim) {
            standing.reset_score();
            if let Some(mind) = control.mind_mut() {
                mind.force_idle();
            }
        }

        crate::log_info(&format!(
            "🏆 {} wins the duel against {} (+{} prestige)",
            hit.owner_key, victim_tag.0, config.win_reward
        ));
        duels.write(DuelWon {
            winner: hit.owner,
            loser: hit.victim,
            reward: config.win_reward,
        });
    }
}
