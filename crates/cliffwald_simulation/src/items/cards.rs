//! Коллекционные карточки волшебников
//!
//! Статический реестр: id 1..=16, в inventory карточка хранится как `card_<id>`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardRarity {
    Common,
    Rare,
    Legendary,
}

/// Определение карточки (immutable)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardDefinition {
    pub id: u32,
    pub name: &'static str,
    pub rarity: CardRarity,
}

impl CardDefinition {
    /// Ключ предмета в Inventory
    pub fn item_id(&self) -> String {
        card_item_id(self.id)
    }
}

pub const CARD_REGISTRY: [CardDefinition; 16] = [
    CardDefinition { id: 1, name: "Abe no Seimei", rarity: CardRarity::Legendary },
    CardDefinition { id: 2, name: "Baba Yaga", rarity: CardRarity::Rare },
    CardDefinition { id: 3, name: "Circe", rarity: CardRarity::Rare },
    CardDefinition { id: 4, name: "Merlin", rarity: CardRarity::Legendary },
    CardDefinition { id: 5, name: "Morgan le Fay", rarity: CardRarity::Legendary },
    CardDefinition { id: 6, name: "Nicholas Flamel", rarity: CardRarity::Rare },
    CardDefinition { id: 7, name: "Marie Laveau", rarity: CardRarity::Rare },
    CardDefinition { id: 8, name: "Hecate", rarity: CardRarity::Legendary },
    CardDefinition { id: 9, name: "Faust", rarity: CardRarity::Rare },
    CardDefinition { id: 10, name: "Medea", rarity: CardRarity::Rare },
    CardDefinition { id: 11, name: "Paracelsus", rarity: CardRarity::Rare },
    CardDefinition { id: 12, name: "Thoth", rarity: CardRarity::Legendary },
    CardDefinition { id: 13, name: "Cassandra", rarity: CardRarity::Common },
    CardDefinition { id: 14, name: "Solomon", rarity: CardRarity::Rare },
    CardDefinition { id: 15, name: "Michael Scot", rarity: CardRarity::Common },
    CardDefinition { id: 16, name: "Völva", rarity: CardRarity::Common },
];

pub fn card(id: u32) -> Option<&'static CardDefinition> {
    CARD_REGISTRY.iter().find(|card| card.id == id)
}

pub fn card_item_id(id: u32) -> String {
    format!("card_{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ids_are_contiguous() {
        for (index, card) in CARD_REGISTRY.iter().enumerate() {
            assert_eq!(card.id as usize, index + 1);
        }
        assert!(card(0).is_none());
        assert!(card(17).is_none());
    }

    #[test]
    fn test_lookup_and_item_id() {
        let merlin = card(4).unwrap();
        assert_eq!(merlin.name, "Merlin");
        assert_eq!(merlin.rarity, CardRarity::Legendary);
        assert_eq!(merlin.item_id(), "card_4");
    }
}
