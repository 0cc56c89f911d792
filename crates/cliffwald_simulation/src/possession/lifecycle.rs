//! Join / Leave: переключение Control на том же теле
//!
//! Join (Echo → Possessed):
//! 1. сессия уже в мире → возвращаем её entity (повторный join)
//! 2. первый Echo ростера с подходящим факультетом
//! 3. загрузка SessionRecord (ошибка → значения по умолчанию)
//! 4. Control::Possessed + SessionTag(session) одним insert
//!
//! Leave (Possessed → Echo):
//! 1. сессии нет / уже Echo → no-op (идемпотентность)
//! 2. fire-and-forget сохранение
//! 3. вытеснение самых старых Echo, пока ростер ≥ max_echoes
//! 4. Control::Echo со слотовым расписанием, идентичность слота обратно

use bevy::prelude::*;

use super::persistence::{SessionSave, SessionStoreHandle};
use super::{EchoEvicted, EchoRoster, SessionIndex, SpawnConfig};
use crate::ai::EchoMind;
use crate::combat::CastCooldowns;
use crate::components::{
    world_to_ground, Character, Control, DuelStanding, House, Inventory, MoveIntent, PlayerLink, Prestige,
    SessionTag, StudentSlot,
};
use crate::{log, log_error, log_info};

/// Запрос на вход клиента
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequest {
    pub session_id: String,
    /// Ключ записи в SessionStore
    pub account_key: String,
    pub username: String,
    /// Фильтр факультета (None — любой свободный слот)
    pub house: Option<House>,
}

impl JoinRequest {
    pub fn new(session_id: impl Into<String>, account_key: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            account_key: account_key.into(),
            username: username.into(),
            house: None,
        }
    }

    pub fn with_house(mut self, house: House) -> Self {
        self.house = Some(house);
        self
    }
}

/// Первый Echo ростера, подходящий под фильтр факультета
fn find_free_slot(world: &World, house: Option<House>) -> Option<Entity> {
    let roster = world.get_resource::<EchoRoster>()?;
    roster.iter().find(|entity| {
        let Some(control) = world.get::<Control>(*entity) else {
            return false;
        };
        let Some(slot) = world.get::<StudentSlot>(*entity) else {
            return false;
        };
        control.is_echo() && house.is_none_or(|wanted| wanted == slot.house)
    })
}

/// Join: вселить клиента в свободного Echo
///
/// Возвращает entity тела или None, если свободных слотов нет.
pub fn possess(world: &mut World, request: JoinRequest) -> Option<Entity> {
    if let Some(existing) = world.get_resource::<SessionIndex>()?.get(&request.session_id) {
        log(&format!("Join: session {} already present as {:?}", request.session_id, existing));
        return Some(existing);
    }

    let Some(entity) = find_free_slot(world, request.house) else {
        log_info(&format!(
            "Join rejected for {}: no free student slot (house filter {:?})",
            request.session_id, request.house
        ));
        return None;
    };

    let record = world
        .get_resource::<SessionStoreHandle>()
        .map(|store| store.load_or_default(&request.account_key))
        .unwrap_or_default();

    let slot_id = world.get::<StudentSlot>(entity)?.slot_id.clone();

    world.resource_mut::<EchoRoster>().remove(entity);
    {
        let mut index = world.resource_mut::<SessionIndex>();
        index.remove(&slot_id);
        index.insert(request.session_id.clone(), entity);
    }

    let mut character_entity = world.entity_mut(entity);
    character_entity.insert((
        Control::Possessed(PlayerLink {
            session_id: request.session_id.clone(),
            account_key: request.account_key.clone(),
        }),
        SessionTag(request.session_id.clone()),
        MoveIntent::idle(),
        // Prestige из хранилища — источник истины (очки Echo не переносятся)
        Prestige(record.prestige),
        Inventory(record.inventory),
        // Дуэль Echo не наследуется: arena заново отметит вход на следующем тике
        DuelStanding::default(),
    ));
    if let Some(mut character) = character_entity.get_mut::<Character>() {
        character.display_name = request.username.clone();
    }

    log_info(&format!(
        "Join: {} ({}) possessed {} as {:?}",
        request.username, request.session_id, slot_id, entity
    ));
    Some(entity)
}

/// Удалить самый старый Echo целиком (тело, ECS запись, индекс)
fn evict_oldest(world: &mut World) -> Option<EchoEvicted> {
    let entity = world.resource_mut::<EchoRoster>().pop_oldest()?;
    let key = world
        .get::<SessionTag>(entity)
        .map(|tag| tag.0.clone())
        .unwrap_or_default();

    world.resource_mut::<SessionIndex>().remove(&key);
    if let Some(mut cooldowns) = world.get_resource_mut::<CastCooldowns>() {
        cooldowns.forget(entity);
    }
    world.despawn(entity);

    log_info(&format!("Echo limit reached, evicted {} ({:?})", key, entity));
    Some(EchoEvicted { entity, key })
}

/// Leave: вернуть тело под управление Echo
///
/// Идемпотентно: повторный вызов для той же сессии — no-op.
/// Возвращает true, если переход выполнен.
pub fn release(world: &mut World, session_id: &str) -> bool {
    let Some(entity) = world.get_resource::<SessionIndex>().and_then(|index| index.get(session_id)) else {
        log(&format!("Leave: unknown session {}, nothing to do", session_id));
        return false;
    };

    let link = match world.get::<Control>(entity) {
        Some(Control::Possessed(link)) if link.session_id == session_id => link.clone(),
        Some(_) => {
            // Уже сконвертирован (повторный leave / дубликат сессии)
            log(&format!("Leave: {} already released", session_id));
            return false;
        }
        None => {
            // repair_orphaned_characters вернёт телу Echo на следующем тике
            log_error(&format!("Leave: {:?} of {} has no Control, skipping", entity, session_id));
            return false;
        }
    };

    let Some(slot) = world.get::<StudentSlot>(entity).cloned() else {
        log_error(&format!("Leave: {:?} has no StudentSlot, dropping session", entity));
        world.resource_mut::<SessionIndex>().remove(session_id);
        return false;
    };

    let position = world
        .get::<Transform>(entity)
        .map(|t| world_to_ground(t.translation))
        .unwrap_or(slot.routine.sleep);

    // 1. Fire-and-forget сохранение
    if let Some(store) = world.get_resource::<SessionStoreHandle>() {
        store.save_in_background(SessionSave {
            account_key: link.account_key.clone(),
            position,
            inventory: world.get::<Inventory>(entity).map(|i| i.0.clone()).unwrap_or_default(),
            prestige: world.get::<Prestige>(entity).map(|p| p.0).unwrap_or(0),
        });
    }

    // 2. Лимит Echo: освобождаем место до вставки
    let max_echoes = world.get_resource::<SpawnConfig>().map(|c| c.max_echoes).unwrap_or(50);
    while world.resource::<EchoRoster>().len() >= max_echoes {
        let Some(evicted) = evict_oldest(world) else {
            break;
        };
        world.send_event(evicted);
    }

    // 3. Обратно в Echo
    {
        let mut index = world.resource_mut::<SessionIndex>();
        index.remove(session_id);
        index.insert(slot.slot_id.clone(), entity);
    }
    world.resource_mut::<EchoRoster>().push(entity);

    let mut character_entity = world.entity_mut(entity);
    character_entity.insert((
        Control::Echo(EchoMind::new(position, Some(slot.house), Some(slot.routine))),
        SessionTag(slot.slot_id.clone()),
        MoveIntent::idle(),
        DuelStanding::default(),
    ));
    if let Some(mut character) = character_entity.get_mut::<Character>() {
        character.display_name = slot.echo_name.clone();
        character.skin = slot.echo_skin.clone();
    }

    log_info(&format!("Leave: {} released {} back to Echo", session_id, slot.slot_id));
    true
}
