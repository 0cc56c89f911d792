//! Per-tick authoritative snapshot (позиции тел + снаряды + карточки)
//!
//! Собирается после rapier Writeback. Позиции округляются до 0.01,
//! чтобы микро-дрожание тела не порождало лишних обновлений у клиентов.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{ProjectileId, Projectiles, RpsKind};
use crate::components::{world_to_ground, Character, Control, Facing, SessionTag};
use crate::items::{WorldItemId, WorldItems};
use crate::movement::systems::planar_velocity;
use crate::simulation::SimClock;

/// Состояние одного персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// SessionTag (slot id у Echo, session id у игрока)
    pub key: String,
    pub numeric_id: u32,
    pub display_name: String,
    pub skin: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Vec2,
    pub possessed: bool,
}

/// Состояние одного снаряда
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub owner_key: String,
    pub spell_id: String,
    pub kind: RpsKind,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Карточка, лежащая в мире
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: u64,
    pub card_id: u32,
    pub position: Vec2,
}

/// Снимок мира на конец тика (упорядочен по key / id)
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub entities: Vec<EntitySnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub items: Vec<ItemSnapshot>,
}

impl WorldSnapshot {
    pub fn entity(&self, key: &str) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.key == key)
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&ProjectileSnapshot> {
        self.projectiles.iter().find(|p| p.id == id.0)
    }

    pub fn item(&self, id: WorldItemId) -> Option<&ItemSnapshot> {
        self.items.iter().find(|i| i.id == id.0)
    }
}

/// Округление до сотых
pub fn round2(v: Vec2) -> Vec2 {
    (v * 100.0).round() / 100.0
}

/// Система: синхронизация физики в снимок персонажей (Sync)
pub fn sync_entity_snapshot(
    clock: Res<SimClock>,
    mut snapshot: ResMut<WorldSnapshot>,
    characters: Query<(&Character, &SessionTag, &Transform, &Velocity, &Facing, Option<&Control>)>,
) {
    snapshot.tick = clock.tick;
    snapshot.entities.clear();

    for (character, tag, transform, velocity, facing, control) in characters.iter() {
        let position = world_to_ground(transform.translation);
        if !position.is_finite() {
            crate::log_error(&format!("Snapshot: {} has non-finite position", tag.as_str()));
            continue;
        }

        snapshot.entities.push(EntitySnapshot {
            key: tag.0.clone(),
            numeric_id: character.numeric_id,
            display_name: character.display_name.clone(),
            skin: character.skin.clone(),
            position: round2(position),
            velocity: round2(planar_velocity(velocity)),
            facing: facing.0,
            possessed: control.is_some_and(Control::is_possessed),
        });
    }

    snapshot.entities.sort_by(|a, b| a.key.cmp(&b.key));
}

/// Система: снимок снарядов после combat update
pub fn sync_projectile_snapshot(projectiles: Res<Projectiles>, mut snapshot: ResMut<WorldSnapshot>) {
    snapshot.projectiles = projectiles
        .iter()
        .map(|(id, projectile)| ProjectileSnapshot {
            id: id.0,
            owner_key: projectile.owner_key.clone(),
            spell_id: projectile.spell_id.clone(),
            kind: projectile.kind,
            position: round2(projectile.position),
            velocity: projectile.velocity,
        })
        .collect();
}

/// Система: снимок карточек (после спавна и подбора в Update)
pub fn sync_item_snapshot(items: Res<WorldItems>, mut snapshot: ResMut<WorldSnapshot>) {
    snapshot.items = items
        .iter()
        .map(|(id, item)| ItemSnapshot {
            id: id.0,
            card_id: item.card_id,
            position: round2(item.position),
        })
        .collect();
}
