//! Tiled JSON export → LevelData
//!
//! Используемые слои (все objectgroup):
//! - `Collisions` — прямоугольники стен (static collider + blocked тайлы)
//! - `FixedSeats` — места студентов (type bed / seat_class / seat_food, property studentId)
//! - `NPCs` — преподаватели
//! - `Entities` — объект `Spawn` (точка появления)

use bevy::prelude::*;
use serde::Deserialize;

use super::seats::{SeatKind, SeatRegistry};
use super::{LevelData, LevelError, NpcSpawn, WallRect, DEFAULT_SPAWN_POINT};
use crate::navigation::{NavGrid, DEFAULT_TILE_SIZE};

#[derive(Debug, Deserialize)]
struct TiledMap {
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default)]
    tilewidth: f32,
    layers: Vec<TiledLayer>,
}

#[derive(Debug, Deserialize)]
struct TiledLayer {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    objects: Vec<TiledObject>,
}

#[derive(Debug, Deserialize)]
struct TiledObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    /// Tiled ≤1.8 пишет `type`, 1.9+ пишет `class`
    #[serde(default, rename = "type", alias = "class")]
    kind: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    properties: Vec<TiledProperty>,
}

#[derive(Debug, Deserialize)]
struct TiledProperty {
    name: String,
    value: serde_json::Value,
}

impl TiledMap {
    fn objects(&self, layer_name: &str) -> &[TiledObject] {
        self.layers
            .iter()
            .find(|layer| layer.name == layer_name && layer.kind == "objectgroup")
            .map(|layer| layer.objects.as_slice())
            .unwrap_or(&[])
    }
}

impl TiledObject {
    fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|v| v.as_str())
    }

    /// studentId бывает и числом, и строкой
    fn property_u32(&self, name: &str) -> Option<u32> {
        match self.property(name)? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

pub fn parse_level(json: &str) -> Result<LevelData, LevelError> {
    let map: TiledMap = serde_json::from_str(json)?;

    if map.width == 0 || map.height == 0 {
        return Err(LevelError::EmptyGrid {
            width: map.width,
            height: map.height,
        });
    }

    let tile_size = if map.tilewidth > 0.0 {
        map.tilewidth
    } else {
        DEFAULT_TILE_SIZE
    };

    let mut nav = NavGrid::open(map.width, map.height, tile_size);
    let mut walls = Vec::new();
    for obj in map.objects("Collisions") {
        if !(obj.x.is_finite() && obj.y.is_finite() && obj.width > 0.0 && obj.height > 0.0) {
            continue;
        }
        let min = Vec2::new(obj.x, obj.y);
        let size = Vec2::new(obj.width, obj.height);
        nav.block_rect(min, size);
        walls.push(WallRect { min, size });
    }

    Ok(LevelData {
        nav,
        seats: parse_seats(&map),
        spawn_point: parse_spawn(&map),
        walls,
        npcs: parse_npcs(&map),
    })
}

fn parse_seats(map: &TiledMap) -> SeatRegistry {
    let mut seats = SeatRegistry::default();
    for obj in map.objects("FixedSeats") {
        let Some(student_id) = obj.property_u32("studentId") else {
            continue;
        };
        let Some(kind) = SeatKind::from_object_type(&obj.kind) else {
            continue;
        };
        // Сырые координаты Tiled (top-left объекта)
        seats.insert(kind, student_id, Vec2::new(obj.x, obj.y));
    }
    seats
}

fn parse_npcs(map: &TiledMap) -> Vec<NpcSpawn> {
    map.objects("NPCs")
        .iter()
        .map(|obj| NpcSpawn {
            id: obj.id,
            position: Vec2::new(obj.x, obj.y),
            name: if obj.name.is_empty() {
                "Unknown".to_string()
            } else {
                obj.name.clone()
            },
            skin: obj.property_str("skin").unwrap_or("teacher").to_string(),
        })
        .collect()
}

fn parse_spawn(map: &TiledMap) -> Vec2 {
    map.objects("Entities")
        .iter()
        .find(|obj| obj.name == "Spawn" || obj.kind == "Spawn")
        .map(|obj| Vec2::new(obj.x, obj.y))
        .unwrap_or(DEFAULT_SPAWN_POINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "width": 10, "height": 8, "tilewidth": 32, "tileheight": 32,
        "layers": [
            { "name": "Ground", "type": "tilelayer", "data": [] },
            { "name": "Collisions", "type": "objectgroup", "objects": [
                { "id": 1, "x": 64, "y": 0, "width": 32, "height": 96 },
                { "id": 2, "x": 0, "y": 0, "width": 0, "height": 10 }
            ]},
            { "name": "FixedSeats", "type": "objectgroup", "objects": [
                { "id": 3, "type": "bed", "x": 100, "y": 120, "properties": [
                    { "name": "studentId", "type": "int", "value": 0 } ] },
                { "id": 4, "class": "seat_class", "x": 200, "y": 50, "properties": [
                    { "name": "studentId", "type": "string", "value": "7" } ] },
                { "id": 5, "type": "seat_food", "x": 1, "y": 2 }
            ]},
            { "name": "NPCs", "type": "objectgroup", "objects": [
                { "id": 9, "name": "Professor Hecate", "x": 150, "y": 160,
                  "properties": [ { "name": "skin", "type": "string", "value": "witch" } ] },
                { "id": 10, "x": 10, "y": 20 }
            ]},
            { "name": "Entities", "type": "objectgroup", "objects": [
                { "id": 11, "name": "Spawn", "x": 300, "y": 200 }
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_collisions_into_nav_and_walls() {
        let level = parse_level(MAP).unwrap();
        assert_eq!(level.nav.width(), 10);
        assert_eq!(level.nav.height(), 8);
        // Стена 64..96 × 0..96 → тайлы x=2, y=0..3
        assert!(level.nav.is_blocked(2, 0));
        assert!(level.nav.is_blocked(2, 2));
        assert!(!level.nav.is_blocked(2, 3));
        assert_eq!(level.nav.blocked_count(), 3);
        // Вырожденный прямоугольник пропущен
        assert_eq!(level.walls.len(), 1);
    }

    #[test]
    fn test_parse_seats_and_ids() {
        let level = parse_level(MAP).unwrap();
        assert_eq!(level.seats.get(SeatKind::Bed, 0), Some(Vec2::new(100.0, 120.0)));
        assert_eq!(level.seats.get(SeatKind::Class, 7), Some(Vec2::new(200.0, 50.0)));
        // Без studentId объект игнорируется
        assert_eq!(level.seats.len(SeatKind::Food), 0);
    }

    #[test]
    fn test_parse_npcs_and_spawn() {
        let level = parse_level(MAP).unwrap();
        assert_eq!(level.npcs.len(), 2);
        assert_eq!(level.npcs[0].name, "Professor Hecate");
        assert_eq!(level.npcs[0].skin, "witch");
        assert_eq!(level.npcs[1].name, "Unknown");
        assert_eq!(level.npcs[1].skin, "teacher");
        assert_eq!(level.spawn_point, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_missing_spawn_uses_default() {
        let json = r#"{ "width": 2, "height": 2, "tilewidth": 32, "layers": [] }"#;
        let level = parse_level(json).unwrap();
        assert_eq!(level.spawn_point, DEFAULT_SPAWN_POINT);
        assert!(level.npcs.is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(parse_level("{ nope"), Err(LevelError::Json(_))));
        let zero = r#"{ "width": 0, "height": 0, "layers": [] }"#;
        assert!(matches!(parse_level(zero), Err(LevelError::EmptyGrid { .. })));
    }
}
