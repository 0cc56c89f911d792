//! Зона дуэлей: вход/выход и назначение противников
//!
//! Два прохода: сначала собираем, кто внутри (read-only), затем мутируем
//! DuelStanding и Control. Порядок entities не влияет на результат.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{world_to_ground, Character, Control, DuelStanding, House, StudentSlot};

/// Круглая зона дуэлей на тренировочной площадке
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelArena {
    pub center: Vec2,
    pub radius: f32,
}

impl Default for DuelArena {
    fn default() -> Self {
        Self {
            center: Vec2::new(2640.0, 1520.0),
            radius: 300.0,
        }
    }
}

impl DuelArena {
    pub fn contains(&self, point: Vec2) -> bool {
        point.is_finite() && point.distance(self.center) < self.radius
    }
}

/// Участник внутри зоны (снимок первого прохода)
#[derive(Debug, Clone, Copy)]
struct Contender {
    entity: Entity,
    position: Vec2,
    house: Option<House>,
}

/// Ближайший участник другого факультета
///
/// Персонажи без факультета (преподаватели) не дерутся и не выбираются.
fn nearest_rival(me: &Contender, contenders: &[Contender]) -> Option<Entity> {
    let my_house = me.house?;
    contenders
        .iter()
        .filter(|other| other.entity != me.entity)
        .filter(|other| other.house.is_some_and(|house| house != my_house))
        .min_by(|a, b| {
            a.position
                .distance_squared(me.position)
                .total_cmp(&b.position.distance_squared(me.position))
                .then(a.entity.cmp(&b.entity))
        })
        .map(|other| other.entity)
}

/// Система: обновление флагов арены + назначение дуэлей Echo
///
/// - вход: in_arena = true, счёт обнулён
/// - выход: in_arena = false, счёт обнулён, Echo → Idle
/// - Echo внутри без дуэли: ближайший соперник другого факультета
/// - противник покинул арену: дуэль снимается
pub fn assign_duels(
    arena: Res<DuelArena>,
    mut characters: Query<
        (
            Entity,
            &Transform,
            &mut DuelStanding,
            &mut Control,
            Option<&StudentSlot>,
        ),
        With<Character>,
    >,
) {
    // 1. Кто сейчас внутри
    let contenders: Vec<Contender> = characters
        .iter()
        .filter_map(|(entity, transform, _, _, slot)| {
            let position = world_to_ground(transform.translation);
            arena.contains(position).then(|| Contender {
                entity,
                position,
                house: slot.map(|s| s.house),
            })
        })
        .collect();

    // 2. Переходы и назначения
    for (entity, transform, mut standing, mut control, slot) in characters.iter_mut() {
        let inside = contenders.iter().any(|c| c.entity == entity);

        if !inside {
            if standing.in_arena {
                standing.in_arena = false;
                standing.reset_score();
                if let Some(mind) = control.mind_mut() {
                    mind.force_idle();
                }
                crate::log(&format!("⚔️ {:?} left the duel arena", entity));
            }
            continue;
        }

        if !standing.in_arena {
            standing.in_arena = true;
            standing.reset_score();
            crate::log(&format!("⚔️ {:?} entered the duel arena", entity));
        }

        let Some(mind) = control.mind_mut() else {
            continue;
        };

        if let Some(target) = mind.duel_target() {
            if contenders.iter().any(|c| c.entity == target) {
                continue;
            }
            // Противник вышел из зоны (или исчез)
            mind.force_idle();
        }

        let me = Contender {
            entity,
            position: world_to_ground(transform.translation),
            house: slot.map(|s| s.house),
        };
        if let Some(rival) = nearest_rival(&me, &contenders) {
            mind.enter_duel(rival);
            crate::log(&format!("⚔️ {:?} challenges {:?}", entity, rival));
        }
    }
}
