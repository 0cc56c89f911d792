//! Прогресс персонажа: дуэльный счёт, prestige, inventory

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Участие в дуэли (арена + счёт попаданий)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct DuelStanding {
    /// Внутри зоны дуэлей
    pub in_arena: bool,
    /// Попадания в текущем раунде
    pub score: u32,
}

impl DuelStanding {
    pub fn reset_score(&mut self) {
        self.score = 0;
    }
}

/// Личный prestige персонажа
///
/// Инвариант: ≥ 0 (remove_prestige никогда не уводит в минус)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Prestige(pub i64);

/// Предмет инвентаря (хранится в persistence, симуляция только переносит)
#[derive(Debug, Clone, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub count: u32,
}

#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Inventory(pub Vec<InventoryItem>);
