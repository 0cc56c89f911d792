//! Possession domain: Echo ⇄ Possessed
//!
//! Содержит:
//! - spawn: заселение школы (студенты, преподаватели, стены)
//! - lifecycle: possess (Join) / release (Leave) + вытеснение старых Echo
//! - persistence: SessionStore collaborator
//! - repair_orphaned_characters: самовосстановление персонажа без Control
//!
//! Инвариант: тело (Entity + rapier компоненты) переживает Join/Leave,
//! меняются только Control, SessionTag и отображаемая идентичность.

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod lifecycle;
pub mod persistence;
pub mod spawn;


pub use lifecycle::{possess, release, JoinRequest};
pub use persistence::{
    InMemorySessionStore, PersistenceError, SessionRecord, SessionSave, SessionStore, SessionStoreHandle,
};
pub use spawn::{populate_world, LEGACY_TEACHERS};

use crate::ai::EchoMind;
use crate::components::{world_to_ground, Character, Control, StudentSlot};
use crate::simulation::SimulationSet;
use crate::log_error;

/// Параметры населения школы
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Максимум Echo в ростере (старые вытесняются на Leave)
    pub max_echoes: usize,
    pub students_per_house: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_echoes: 50,
            students_per_house: 8,
        }
    }
}

/// SessionTag → Entity (slot id у Echo, session id у игрока)
#[derive(Resource, Debug, Default)]
pub struct SessionIndex {
    by_key: HashMap<String, Entity>,
}

impl SessionIndex {
    pub fn get(&self, key: &str) -> Option<Entity> {
        self.by_key.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entity: Entity) {
        self.by_key.insert(key.into(), entity);
    }

    pub fn remove(&mut self, key: &str) -> Option<Entity> {
        self.by_key.remove(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Ростер Echo, доступных для possession (порядок вставки)
///
/// front — самый старый (первый кандидат на вытеснение).
#[derive(Resource, Debug, Default)]
pub struct EchoRoster {
    order: VecDeque<Entity>,
}

impl EchoRoster {
    pub fn push(&mut self, entity: Entity) {
        self.order.push_back(entity);
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.order.iter().position(|e| *e == entity) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn pop_oldest(&mut self) -> Option<Entity> {
        self.order.pop_front()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.order.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Event: Echo удалён из мира при превышении лимита
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EchoEvicted {
    pub entity: Entity,
    pub key: String,
}

/// Система: персонаж без Control получает Echo по умолчанию
///
/// Нарушение инварианта (ни EchoMind, ни PlayerLink): лог + самовосстановление,
/// тик не прерывается.
pub fn repair_orphaned_characters(
    mut commands: Commands,
    orphans: Query<(Entity, &Transform, Option<&StudentSlot>), (With<Character>, Without<Control>)>,
) {
    for (entity, transform, slot) in orphans.iter() {
        log_error(&format!("Character {:?} has no Control, re-attaching default Echo", entity));
        let home = world_to_ground(transform.translation);
        let mind = match slot {
            Some(slot) => EchoMind::new(home, Some(slot.house), Some(slot.routine)),
            None => EchoMind::stationary(home),
        };
        commands.entity(entity).insert(Control::Echo(mind));
    }
}

/// Possession Plugin
///
/// Ресурсы ростера + repair_orphaned_characters в SimulationSet::Bookkeeping.
/// Join/Leave вызываются host'ом вне тика (SimulationServer).
pub struct PossessionPlugin;

impl Plugin for PossessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EchoEvicted>()
            .init_resource::<SpawnConfig>()
            .init_resource::<SessionIndex>()
            .init_resource::<EchoRoster>()
            .init_resource::<SessionStoreHandle>()
            .add_systems(Update, repair_orphaned_characters.in_set(SimulationSet::Bookkeeping));
    }
}
