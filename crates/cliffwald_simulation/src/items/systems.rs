//! Item systems: появление карточек и подбор
//!
//! Порядок выполнения:
//! 1. seed_initial_items (Startup)
//! 2. spawn_items (Update, Bookkeeping)
//! 3. process_collect_requests (Update, Casting)

use bevy::prelude::*;
use rand::Rng;

use super::cards::{card_item_id, CARD_REGISTRY};
use super::{CollectRequested, ItemCollected, ItemConfig, ItemSpawnTimer, WorldItems};
use crate::components::{world_to_ground, Character, Inventory, InventoryItem, Prestige, SessionTag, StudentSlot};
use crate::level::SchoolLayout;
use crate::prestige::{add_prestige, HousePoints};
use crate::simulation::SimClock;
use crate::DeterministicRng;

/// Результат добавления карточки в коллекцию
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCollection {
    New,
    Duplicate,
}

/// Добавить карточку в inventory (одна копия на карточку)
pub fn collect_card(inventory: &mut Inventory, card_id: u32) -> CardCollection {
    let item_id = card_item_id(card_id);
    if inventory.0.iter().any(|item| item.item_id == item_id) {
        return CardCollection::Duplicate;
    }
    inventory.0.push(InventoryItem { item_id, count: 1 });
    CardCollection::New
}

/// Случайная карточка у случайной точки появления
fn roll_item(rng: &mut DeterministicRng, layout: &SchoolLayout, scatter: f32) -> (u32, Vec2) {
    let points = layout.item_spawn_points();
    let anchor = points[rng.rng.gen_range(0..points.len())];
    let scatter = if scatter.is_finite() { scatter.max(0.0) } else { 0.0 };
    let offset = Vec2::new(
        rng.rng.gen_range(-scatter..=scatter),
        rng.rng.gen_range(-scatter..=scatter),
    );
    let card_id = rng.rng.gen_range(1..=CARD_REGISTRY.len() as u32);
    (card_id, anchor + offset)
}

/// Система (Startup): стартовый набор карточек
pub fn seed_initial_items(
    config: Res<ItemConfig>,
    layout: Res<SchoolLayout>,
    mut rng: ResMut<DeterministicRng>,
    mut items: ResMut<WorldItems>,
) {
    let count = config.initial_items.min(config.max_items);
    for _ in 0..count {
        let (card_id, position) = roll_item(&mut rng, &layout, config.scatter);
        items.spawn(card_id, position);
    }
    crate::log(&format!("🃏 Seeded {} wizard cards", count));
}

/// Система: новая карточка раз в spawn_interval_ms
///
/// Таймер сбрасывается при каждом срабатывании, даже если лимит
/// не даёт создать карточку.
pub fn spawn_items(
    clock: Res<SimClock>,
    config: Res<ItemConfig>,
    layout: Res<SchoolLayout>,
    mut timer: ResMut<ItemSpawnTimer>,
    mut rng: ResMut<DeterministicRng>,
    mut items: ResMut<WorldItems>,
) {
    timer.0 += clock.delta_ms;
    if timer.0 <= config.spawn_interval_ms {
        return;
    }
    timer.0 = 0.0;

    if items.len() >= config.max_items {
        return;
    }

    let (card_id, position) = roll_item(&mut rng, &layout, config.scatter);
    let id = items.spawn(card_id, position);
    crate::log(&format!(
        "🃏 Card {} spawned as item {} at ({:.0}, {:.0})",
        card_id, id.0, position.x, position.y
    ));
}

/// Система: обработка CollectRequested
///
/// Далёкие, уже подобранные и неизвестные карточки молча отбрасываются.
pub fn process_collect_requests(
    config: Res<ItemConfig>,
    mut items: ResMut<WorldItems>,
    mut house_points: ResMut<HousePoints>,
    mut requests: EventReader<CollectRequested>,
    mut collected: EventWriter<ItemCollected>,
    mut collectors: Query<
        (&Transform, &SessionTag, &mut Inventory, &mut Prestige, Option<&StudentSlot>),
        With<Character>,
    >,
) {
    for request in requests.read() {
        let Ok((transform, tag, mut inventory, mut prestige, slot)) = collectors.get_mut(request.collector) else {
            continue;
        };
        let Some(item) = items.get(request.item).copied() else {
            continue;
        };

        let position = world_to_ground(transform.translation);
        if !position.is_finite() || position.distance(item.position) >= config.pickup_radius {
            continue;
        }

        let duplicate = collect_card(&mut inventory, item.card_id) == CardCollection::Duplicate;
        let reward = if duplicate {
            let house = slot.map(|slot| slot.house);
            add_prestige(&mut prestige, house, &mut house_points, config.duplicate_reward)
        } else {
            0
        };
        items.remove(request.item);

        crate::log(&format!(
            "🃏 {} collected card {}{}",
            tag.as_str(),
            item.card_id,
            if duplicate { " (duplicate)" } else { "" }
        ));

        collected.write(ItemCollected {
            collector: request.collector,
            collector_key: tag.0.clone(),
            item: request.item,
            card_id: item.card_id,
            duplicate,
            reward,
        });
    }
}
