//! Combat events

use bevy::prelude::*;

use super::projectile::ProjectileId;
use super::spells::RpsKind;

/// Event: запрос каста (от клиента через SimulationServer или от AI)
///
/// Обрабатывается process_cast_requests: реестр + cooldown → снаряд.
#[derive(Event, Debug, Clone)]
pub struct CastRequested {
    pub caster: Entity,
    pub spell_id: String,
    pub aim: Vec2,
}

/// Event: каст принят, снаряд создан
#[derive(Event, Debug, Clone)]
pub struct SpellCast {
    pub projectile: ProjectileId,
    pub caster: Entity,
    pub spell_id: String,
    pub kind: RpsKind,
}

/// Event (внутренний): ray снаряда задел чужое тело
#[derive(Event, Debug, Clone)]
pub struct ProjectileStruck {
    pub projectile: ProjectileId,
    pub owner: Entity,
    pub owner_key: String,
    pub victim: Entity,
    pub spell_id: String,
}

/// Event: попадание по персонажу (наружу, для networking)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayerHit {
    pub projectile: ProjectileId,
    pub attacker_key: String,
    pub victim: Entity,
    pub victim_key: String,
    pub spell_id: String,
}

/// Event: дуэль выиграна (счёт достиг порога)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DuelWon {
    pub winner: Entity,
    pub loser: Entity,
    pub reward: i64,
}
