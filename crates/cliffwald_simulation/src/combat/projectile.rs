//! Снаряды: arena по стабильному id + cooldown'ы кастеров
//!
//! Снаряды не физические тела: позиция интегрируется вручную,
//! попадания ищутся ray cast'ом по смещению за тик.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bevy::prelude::*;

use super::spells::{RpsKind, SpellRegistry};

/// Стабильный id снаряда (монотонный счётчик)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectileId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub owner: Entity,
    /// SessionTag владельца на момент каста
    pub owner_key: String,
    pub spell_id: String,
    pub kind: RpsKind,
    pub position: Vec2,
    pub origin: Vec2,
    pub velocity: Vec2,
    pub spawned_at_ms: f64,
    pub max_range: f32,
}

impl Projectile {
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.spawned_at_ms
    }

    pub fn traveled(&self) -> f32 {
        self.position.distance(self.origin)
    }
}

/// Живые снаряды (упорядочены по id → детерминированный обход пар)
#[derive(Resource, Debug, Default)]
pub struct Projectiles {
    live: BTreeMap<ProjectileId, Projectile>,
    next_id: u64,
}

impl Projectiles {
    pub fn spawn(&mut self, projectile: Projectile) -> ProjectileId {
        self.next_id += 1;
        let id = ProjectileId(self.next_id);
        self.live.insert(id, projectile);
        id
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.live.iter().map(|(id, p)| (*id, p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ProjectileId, &mut Projectile)> {
        self.live.iter_mut().map(|(id, p)| (*id, p))
    }

    /// Удалить всех помеченных за один проход
    pub fn remove_all(&mut self, doomed: &BTreeSet<ProjectileId>) {
        if doomed.is_empty() {
            return;
        }
        self.live.retain(|id, _| !doomed.contains(id));
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

/// Время последнего принятого каста по кастеру
#[derive(Resource, Debug, Default)]
pub struct CastCooldowns {
    last_cast_ms: HashMap<Entity, f64>,
}

impl CastCooldowns {
    /// Проверить cooldown и, если прошёл, записать новый каст
    ///
    /// Первый каст кастера всегда разрешён.
    pub fn try_start(&mut self, caster: Entity, cooldown_ms: f32, now_ms: f64) -> bool {
        if let Some(last) = self.last_cast_ms.get(&caster) {
            if now_ms - last < cooldown_ms as f64 {
                return false;
            }
        }
        self.last_cast_ms.insert(caster, now_ms);
        true
    }

    /// Забыть кастера (entity удалена)
    pub fn forget(&mut self, caster: Entity) {
        self.last_cast_ms.remove(&caster);
    }
}

/// Параметры каста (валидированы снаружи только по факту существования кастера)
pub struct CastAttempt<'a> {
    pub caster: Entity,
    pub owner_key: &'a str,
    pub origin: Vec2,
    pub spell_id: &'a str,
    pub aim: Vec2,
    pub now_ms: f64,
    pub max_range: f32,
}

/// Валидация каста и создание снаряда
///
/// Неизвестный spell id, cooldown или мусорный aim → None без ошибок
/// (граница безопасности: такие запросы часто шлёт атакующий клиент).
pub fn try_cast(
    registry: &SpellRegistry,
    cooldowns: &mut CastCooldowns,
    projectiles: &mut Projectiles,
    attempt: CastAttempt,
) -> Option<ProjectileId> {
    let spell = registry.get(attempt.spell_id)?;
    if !attempt.origin.is_finite() {
        return None;
    }
    if !cooldowns.try_start(attempt.caster, spell.cooldown_ms, attempt.now_ms) {
        return None;
    }

    let direction = attempt
        .aim
        .try_normalize()
        .unwrap_or_else(|| spell.default_axis.normalize_or_zero());

    Some(projectiles.spawn(Projectile {
        owner: attempt.caster,
        owner_key: attempt.owner_key.to_string(),
        spell_id: attempt.spell_id.to_string(),
        kind: spell.kind,
        position: attempt.origin,
        origin: attempt.origin,
        velocity: direction * spell.speed,
        spawned_at_ms: attempt.now_ms,
        max_range: attempt.max_range,
    }))
}
