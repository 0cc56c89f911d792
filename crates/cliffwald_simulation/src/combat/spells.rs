//! Spell registry и rock–paper–scissors таблица
//!
//! circle = rock, square = paper, triangle = scissors.
//! Rock бьёт scissors, scissors бьёт paper, paper бьёт rock.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// RPS категория снаряда
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpsKind {
    Rock,
    Paper,
    Scissors,
}

impl RpsKind {
    /// Кого этот тип побеждает (ровно один)
    pub fn beats(self) -> RpsKind {
        match self {
            RpsKind::Rock => RpsKind::Scissors,
            RpsKind::Scissors => RpsKind::Paper,
            RpsKind::Paper => RpsKind::Rock,
        }
    }
}

/// Исход столкновения двух снарядов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClashOutcome {
    /// Одинаковые типы: оба уничтожены
    Mutual,
    /// Первый побеждает, второй уничтожен
    FirstWins,
    /// Второй побеждает, первый уничтожен
    SecondWins,
}

pub fn resolve_clash(first: RpsKind, second: RpsKind) -> ClashOutcome {
    if first == second {
        ClashOutcome::Mutual
    } else if first.beats() == second {
        ClashOutcome::FirstWins
    } else {
        ClashOutcome::SecondWins
    }
}

/// Параметры заклинания
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SpellConfig {
    pub kind: RpsKind,
    /// px/s
    pub speed: f32,
    pub cooldown_ms: f32,
    /// Направление при нулевом aim векторе
    pub default_axis: Vec2,
}

/// Фиксированный реестр заклинаний (id → параметры)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellRegistry {
    spells: BTreeMap<String, SpellConfig>,
}

impl Default for SpellRegistry {
    fn default() -> Self {
        let basic = |kind| SpellConfig {
            kind,
            speed: 400.0,
            cooldown_ms: 500.0,
            default_axis: Vec2::X,
        };

        let mut spells = BTreeMap::new();
        spells.insert("circle".to_string(), basic(RpsKind::Rock));
        spells.insert("square".to_string(), basic(RpsKind::Paper));
        spells.insert("triangle".to_string(), basic(RpsKind::Scissors));
        Self { spells }
    }
}

impl SpellRegistry {
    pub fn get(&self, spell_id: &str) -> Option<&SpellConfig> {
        self.spells.get(spell_id)
    }

    pub fn insert(&mut self, spell_id: impl Into<String>, config: SpellConfig) {
        self.spells.insert(spell_id.into(), config);
    }

    /// Заклинания, из которых AI выбирает в дуэли (детерминированный порядок)
    pub fn duel_spell_ids(&self) -> Vec<String> {
        self.spells.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RpsKind; 3] = [RpsKind::Rock, RpsKind::Paper, RpsKind::Scissors];

    #[test]
    fn test_rps_forms_a_cycle() {
        for kind in ALL {
            let wins = ALL
                .iter()
                .filter(|other| resolve_clash(kind, **other) == ClashOutcome::FirstWins)
                .count();
            let losses = ALL
                .iter()
                .filter(|other| resolve_clash(kind, **other) == ClashOutcome::SecondWins)
                .count();
            assert_eq!(wins, 1, "{:?} должен бить ровно один тип", kind);
            assert_eq!(losses, 1, "{:?} должен проигрывать ровно одному типу", kind);
            assert_eq!(resolve_clash(kind, kind), ClashOutcome::Mutual);
        }
    }

    #[test]
    fn test_registry_shapes_map_to_rps() {
        let registry = SpellRegistry::default();
        let circle = registry.get("circle").unwrap().kind;
        let square = registry.get("square").unwrap().kind;
        let triangle = registry.get("triangle").unwrap().kind;

        // paper (square) бьёт rock (circle), rock бьёт scissors (triangle)
        assert_eq!(resolve_clash(square, circle), ClashOutcome::FirstWins);
        assert_eq!(resolve_clash(circle, triangle), ClashOutcome::FirstWins);
        assert_eq!(resolve_clash(triangle, square), ClashOutcome::FirstWins);
        assert!(registry.get("fireball").is_none());
    }

    #[test]
    fn test_duel_spells_sorted() {
        let registry = SpellRegistry::default();
        assert_eq!(registry.duel_spell_ids(), vec!["circle", "square", "triangle"]);
    }
}
