//! Идентичность персонажа: Character, SessionTag, StudentSlot, House

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Персонаж школы (студент или преподаватель) с физическим телом
///
/// Автоматически добавляет MoveIntent, Facing, DuelStanding, Prestige, Inventory через Required Components.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(
    crate::components::MoveIntent,
    crate::components::Facing,
    crate::components::DuelStanding,
    crate::components::Prestige,
    crate::components::Inventory
)]
pub struct Character {
    /// Стабильный числовой id: сид для дисперсии, stagger и strafe
    pub numeric_id: u32,
    /// Отображаемое имя (меняется при possession)
    pub display_name: String,
    pub skin: String,
}

/// Ключ сессии, которой принадлежит тело в данный момент
///
/// Echo: slot id (`student_ignis_1`), Possessed: session id клиента.
/// Используется для владения снарядами и атрибуции попаданий.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct SessionTag(pub String);

impl SessionTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Факультет (house) студента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum House {
    Ignis,
    Axiom,
    Vesper,
}

impl House {
    pub const ALL: [House; 3] = [House::Ignis, House::Axiom, House::Vesper];

    pub fn as_str(&self) -> &'static str {
        match self {
            House::Ignis => "ignis",
            House::Axiom => "axiom",
            House::Vesper => "vesper",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            House::Ignis => "Ignis",
            House::Axiom => "Axiom",
            House::Vesper => "Vesper",
        }
    }

    pub fn parse(name: &str) -> Option<House> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ignis" => Some(House::Ignis),
            "axiom" => Some(House::Axiom),
            "vesper" => Some(House::Vesper),
            _ => None,
        }
    }
}

/// Точки расписания студента (кровать / парта / место в столовой)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct RoutineSpots {
    pub sleep: Vec2,
    pub class: Vec2,
    pub eat: Vec2,
}

/// Слот студента — постоянная идентичность, переживающая possession
///
/// Инвариант: слот не меняется на протяжении жизни тела. Join/Leave меняют
/// только Control и SessionTag, StudentSlot остаётся исходным.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct StudentSlot {
    /// Детерминированный slot id (`student_<house>_<n>`)
    pub slot_id: String,
    /// Индекс места в seat registry (numeric_id - 1)
    pub seat_index: u32,
    pub house: House,
    pub routine: RoutineSpots,
    /// Имя Echo, которое возвращается при Leave
    pub echo_name: String,
    pub echo_skin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_parse_roundtrip_names() {
        for house in House::ALL {
            assert_eq!(House::parse(house.as_str()), Some(house));
            assert_eq!(House::parse(house.title()), Some(house));
        }
        assert_eq!(House::parse("slytherin"), None);
    }

    #[test]
    fn test_house_serde_lowercase() {
        let json = serde_json::to_string(&House::Vesper).unwrap();
        assert_eq!(json, "\"vesper\"");
        let parsed: House = serde_json::from_str("\"axiom\"").unwrap();
        assert_eq!(parsed, House::Axiom);
    }
}
