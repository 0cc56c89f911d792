//! SimulationServer: host API симуляции
//!
//! Владеет bevy App. Host (сетевой слой) вызывает:
//! - tick(delta_ms, hour) с целевой частотой
//! - apply_input / request_cast / collect_item по session id
//! - deduct_prestige: штраф модерации
//! - join / leave вне тика
//! - snapshot + drain_* для рассылки клиентам
//!
//! Исходящие события живут два тика (двойной буфер bevy Events),
//! поэтому drain_* нужно вызывать после каждого tick.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::clock::SimClock;
use super::config::SimulationConfig;
use super::snapshot::WorldSnapshot;
use crate::combat::{CastRequested, DuelWon, PlayerHit, SpellCast};
use crate::components::{finite_or_zero, Control, MoveIntent, Prestige, StudentSlot};
use crate::items::{CollectRequested, ItemCollected, WorldItemId, WorldItems};
use crate::level::LevelData;
use crate::possession::{
    populate_world, possess, release, EchoEvicted, JoinRequest, SessionIndex, SessionStore, SessionStoreHandle,
};
use crate::prestige::{remove_prestige, AcademicCalendar, HouseCupAwarded, HousePoints};
use crate::{create_headless_app, log_info, SimulationPlugin};

pub struct SimulationServer {
    app: App,
    config: SimulationConfig,
}

impl SimulationServer {
    /// Собрать App, заселить школу по уровню
    pub fn new(config: SimulationConfig, level: LevelData, store: Arc<dyn SessionStore>) -> Self {
        let mut app = create_headless_app(config.seed);
        app.add_plugins(SimulationPlugin::new(config.clone()))
            .insert_resource(SessionStoreHandle::new(store));
        app.finish();
        app.cleanup();

        populate_world(app.world_mut(), &level);

        log_info(&format!(
            "Simulation server ready (seed {}, {} Hz)",
            config.seed, config.tick_hz
        ));
        Self { app, config }
    }

    /// Один тик симуляции
    ///
    /// `delta_ms` — измеренное host'ом wall-clock время с прошлого тика.
    pub fn tick(&mut self, delta_ms: f32, virtual_hour: u32) {
        let world = self.app.world_mut();
        let dt = {
            let mut clock = world.resource_mut::<SimClock>();
            clock.advance(delta_ms, virtual_hour);
            clock.delta_secs()
        };
        world.insert_resource(TimestepMode::Fixed { dt, substeps: 1 });

        self.app.update();
    }

    /// Ввод движения клиента (только для Possessed тела этой сессии)
    ///
    /// Analog длиннее единицы обрезается, NaN → 0. Возвращает false для
    /// неизвестной сессии.
    pub fn apply_input(&mut self, session_id: &str, intent: MoveIntent) -> bool {
        let Some(entity) = self.possessed_entity(session_id) else {
            return false;
        };
        let world = self.app.world_mut();
        match world.get_mut::<MoveIntent>(entity) {
            Some(mut current) => {
                *current = intent.sanitized();
                true
            }
            None => false,
        }
    }

    /// Запрос каста от клиента (валидация на следующем тике)
    pub fn request_cast(&mut self, session_id: &str, spell_id: &str, aim: Vec2) -> bool {
        let Some(caster) = self.possessed_entity(session_id) else {
            return false;
        };
        self.app.world_mut().send_event(CastRequested {
            caster,
            spell_id: spell_id.to_string(),
            aim: finite_or_zero(aim),
        });
        true
    }

    /// Запрос подбора карточки (дистанция проверяется на следующем тике)
    pub fn collect_item(&mut self, session_id: &str, item: WorldItemId) -> bool {
        let Some(collector) = self.possessed_entity(session_id) else {
            return false;
        };
        self.app.world_mut().send_event(CollectRequested { collector, item });
        true
    }

    /// Штраф игроку: prestige снимается сразу, не больше личного баланса
    ///
    /// Очки факультета слота уменьшаются на ту же сумму. None: сессия
    /// не управляет телом.
    pub fn deduct_prestige(&mut self, session_id: &str, amount: i64) -> Option<i64> {
        let entity = self.possessed_entity(session_id)?;
        let removed = self.app.world_mut().resource_scope(|world, mut house_points: Mut<HousePoints>| {
            let house = world.get::<StudentSlot>(entity).map(|slot| slot.house);
            let mut prestige = world.get_mut::<Prestige>(entity)?;
            Some(remove_prestige(&mut prestige, house, &mut house_points, amount))
        })?;

        log_info(&format!("Prestige penalty for {}: -{} (requested {})", session_id, removed, amount));
        Some(removed)
    }

    pub fn join(&mut self, request: JoinRequest) -> Option<Entity> {
        possess(self.app.world_mut(), request)
    }

    pub fn leave(&mut self, session_id: &str) -> bool {
        release(self.app.world_mut(), session_id)
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        self.app.world().resource::<WorldSnapshot>()
    }

    pub fn drain_player_hits(&mut self) -> Vec<PlayerHit> {
        self.drain::<PlayerHit>()
    }

    pub fn drain_duel_results(&mut self) -> Vec<DuelWon> {
        self.drain::<DuelWon>()
    }

    pub fn drain_spell_casts(&mut self) -> Vec<SpellCast> {
        self.drain::<SpellCast>()
    }

    pub fn drain_evictions(&mut self) -> Vec<EchoEvicted> {
        self.drain::<EchoEvicted>()
    }

    pub fn drain_item_pickups(&mut self) -> Vec<ItemCollected> {
        self.drain::<ItemCollected>()
    }

    pub fn drain_house_cups(&mut self) -> Vec<HouseCupAwarded> {
        self.drain::<HouseCupAwarded>()
    }

    fn drain<E: Event>(&mut self) -> Vec<E> {
        self.app
            .world_mut()
            .get_resource_mut::<Events<E>>()
            .map(|mut events| events.drain().collect())
            .unwrap_or_default()
    }

    pub fn entity_for_session(&self, key: &str) -> Option<Entity> {
        self.app.world().resource::<SessionIndex>().get(key)
    }

    fn possessed_entity(&self, session_id: &str) -> Option<Entity> {
        let entity = self.entity_for_session(session_id)?;
        match self.app.world().get::<Control>(entity)? {
            Control::Possessed(link) if link.session_id == session_id => Some(entity),
            _ => None,
        }
    }

    pub fn house_points(&self) -> &HousePoints {
        self.app.world().resource::<HousePoints>()
    }

    pub fn calendar(&self) -> AcademicCalendar {
        *self.app.world().resource::<AcademicCalendar>()
    }

    pub fn items(&self) -> &WorldItems {
        self.app.world().resource::<WorldItems>()
    }

    pub fn clock(&self) -> SimClock {
        *self.app.world().resource::<SimClock>()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
