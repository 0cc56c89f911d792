//! SimulationConfig: все параметры симуляции одним JSON документом
//!
//! Каждое поле — отдельный Resource со своими значениями по умолчанию,
//! пропущенные в JSON поля берутся из Default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::AIConfig;
use crate::combat::{CombatConfig, DuelArena, SpellRegistry};
use crate::items::ItemConfig;
use crate::level::SchoolLayout;
use crate::movement::MovementConfig;
use crate::possession::SpawnConfig;
use crate::prestige::{CalendarConfig, PrestigeConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tick_hz must be positive, got {0}")]
    InvalidTickRate(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed DeterministicRng (выбор заклинаний AI)
    pub seed: u64,
    /// Целевая частота тиков host'а
    pub tick_hz: f32,
    pub movement: MovementConfig,
    pub ai: AIConfig,
    pub combat: CombatConfig,
    pub spells: SpellRegistry,
    pub spawn: SpawnConfig,
    pub layout: SchoolLayout,
    pub arena: DuelArena,
    pub prestige: PrestigeConfig,
    pub calendar: CalendarConfig,
    pub items: ItemConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 30.0,
            movement: MovementConfig::default(),
            ai: AIConfig::default(),
            combat: CombatConfig::default(),
            spells: SpellRegistry::default(),
            spawn: SpawnConfig::default(),
            layout: SchoolLayout::default(),
            arena: DuelArena::default(),
            prestige: PrestigeConfig::default(),
            calendar: CalendarConfig::default(),
            items: ItemConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }
        Ok(())
    }

    /// Длительность тика при целевой частоте (ms)
    pub fn tick_interval_ms(&self) -> f32 {
        1000.0 / self.tick_hz
    }
}
