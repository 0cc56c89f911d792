//! Level data: всё, что симуляция берёт из карты
//!
//! Карта парсится один раз при старте. Отсутствующий или битый файл —
//! не фатально: `load_or_empty` логирует ошибку и отдаёт пустой уровень
//! (открытая NavGrid, формационные места, legacy преподаватели).

use std::path::Path;

use bevy::prelude::*;

pub mod layout;
pub mod seats;
pub mod tiled;

pub use layout::{RoamArea, SchoolLayout};
pub use seats::{SeatKind, SeatRegistry, STUDENTS_PER_HOUSE};

use crate::navigation::{NavGrid, DEFAULT_TILE_SIZE};
use crate::{log_error, log_info};

/// Точка появления, если в слое Entities нет Spawn
pub const DEFAULT_SPAWN_POINT: Vec2 = Vec2::new(256.0, 256.0);

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level grid is empty ({width}x{height})")]
    EmptyGrid { width: usize, height: usize },
}

/// Прямоугольник стены (top-left + размер, мировые координаты)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl WallRect {
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }
}

/// Преподаватель из слоя NPCs
#[derive(Debug, Clone, PartialEq)]
pub struct NpcSpawn {
    pub id: u32,
    pub position: Vec2,
    pub name: String,
    pub skin: String,
}

/// Результат разбора карты
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub nav: NavGrid,
    pub seats: SeatRegistry,
    pub spawn_point: Vec2,
    pub walls: Vec<WallRect>,
    pub npcs: Vec<NpcSpawn>,
}

impl Default for LevelData {
    fn default() -> Self {
        Self::empty()
    }
}

impl LevelData {
    /// Degraded mode: открытая сетка, без стен и мест
    pub fn empty() -> Self {
        Self::empty_for(&SchoolLayout::default())
    }

    /// Пустой уровень, чья сетка накрывает все точки и зоны `layout`
    pub fn empty_for(layout: &SchoolLayout) -> Self {
        Self {
            nav: NavGrid::open_covering(layout.extent(), DEFAULT_TILE_SIZE),
            seats: SeatRegistry::default(),
            spawn_point: DEFAULT_SPAWN_POINT,
            walls: Vec::new(),
            npcs: Vec::new(),
        }
    }

    pub fn from_tiled_json(json: &str) -> Result<Self, LevelError> {
        tiled::parse_level(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_tiled_json(&json)
    }

    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(level) => {
                log_info(&format!(
                    "Level loaded from {}: {}x{} tiles, {} walls, {} beds, {} class seats, {} food seats, {} NPCs",
                    path.display(),
                    level.nav.width(),
                    level.nav.height(),
                    level.walls.len(),
                    level.seats.len(SeatKind::Bed),
                    level.seats.len(SeatKind::Class),
                    level.seats.len(SeatKind::Food),
                    level.npcs.len()
                ));
                level
            }
            Err(err) => {
                log_error(&format!(
                    "Level {} unavailable ({}), falling back to empty level",
                    path.display(),
                    err
                ));
                Self::empty()
            }
        }
    }
}
