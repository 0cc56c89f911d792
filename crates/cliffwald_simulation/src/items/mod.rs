//! Items: карточки волшебников, разбросанные по школе
//!
//! ECS ответственность:
//! - WorldItems (resource): лежащие в мире карточки, стабильные id
//! - spawn_items: новая карточка раз в интервал, пока их меньше лимита
//! - process_collect_requests: подбор рядом с телом игрока:
//!   новая карточка → Inventory, дубликат → prestige
//!
//! Events: CollectRequested (вход от SimulationServer), ItemCollected (наружу).

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod cards;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use cards::{card, card_item_id, CardDefinition, CardRarity, CARD_REGISTRY};
pub use systems::{collect_card, process_collect_requests, seed_initial_items, spawn_items, CardCollection};

use crate::simulation::SimulationSet;

/// Параметры предметов
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Интервал появления новой карточки (ms)
    pub spawn_interval_ms: f32,
    /// Лимит карточек в мире
    pub max_items: usize,
    /// Дистанция подбора (строго меньше)
    pub pickup_radius: f32,
    /// Prestige за дубликат уже собранной карточки
    pub duplicate_reward: i64,
    /// Разброс вокруг точки появления (± по каждой оси)
    pub scatter: f32,
    /// Карточек при старте сервера
    pub initial_items: usize,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 60_000.0,
            max_items: 10,
            pickup_radius: 60.0,
            duplicate_reward: 5,
            scatter: 200.0,
            initial_items: 5,
        }
    }
}

/// Стабильный id карточки в мире (монотонный счётчик)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldItemId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldItem {
    pub card_id: u32,
    pub position: Vec2,
}

/// Карточки в мире (BTreeMap → детерминированный порядок снимка)
#[derive(Resource, Debug, Default)]
pub struct WorldItems {
    live: BTreeMap<WorldItemId, WorldItem>,
    next_id: u64,
}

impl WorldItems {
    pub fn spawn(&mut self, card_id: u32, position: Vec2) -> WorldItemId {
        self.next_id += 1;
        let id = WorldItemId(self.next_id);
        self.live.insert(id, WorldItem { card_id, position });
        id
    }

    pub fn get(&self, id: WorldItemId) -> Option<&WorldItem> {
        self.live.get(&id)
    }

    pub fn remove(&mut self, id: WorldItemId) -> Option<WorldItem> {
        self.live.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorldItemId, &WorldItem)> {
        self.live.iter().map(|(id, item)| (*id, item))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

/// Накопленное время с последнего появления (ms)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemSpawnTimer(pub f32);

/// Event: игрок пытается подобрать карточку
#[derive(Event, Debug, Clone)]
pub struct CollectRequested {
    pub collector: Entity,
    pub item: WorldItemId,
}

/// Event: карточка подобрана (наружу, для networking)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ItemCollected {
    pub collector: Entity,
    pub collector_key: String,
    pub item: WorldItemId,
    pub card_id: u32,
    /// Карточка уже была в коллекции
    pub duplicate: bool,
    /// Начисленный prestige (0 для новой карточки)
    pub reward: i64,
}

/// Item Plugin
///
/// - seed_initial_items (Startup): стартовый набор карточек
/// - spawn_items (Update, Bookkeeping)
/// - process_collect_requests (Update, Casting), после движения и AI
pub struct ItemPlugin;

impl Plugin for ItemPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollectRequested>().add_event::<ItemCollected>();

        app.init_resource::<ItemConfig>()
            .init_resource::<WorldItems>()
            .init_resource::<ItemSpawnTimer>();

        app.add_systems(Startup, seed_initial_items).add_systems(
            Update,
            (
                spawn_items.in_set(SimulationSet::Bookkeeping),
                process_collect_requests.in_set(SimulationSet::Casting),
            ),
        );
    }
}
