//! Persistence collaborator: загрузка сессии на Join, сохранение на Leave
//!
//! Симуляция знает только trait SessionStore. Сохранение запускается
//! fire-and-forget на IoTaskPool: тик никогда не ждёт I/O, ошибка только
//! логируется.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, TaskPool};
use serde::{Deserialize, Serialize};

use crate::components::{House, InventoryItem};
use crate::log_error;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("no stored session for {0}")]
    NotFound(String),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Сохранённое состояние игрока
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    pub position: Option<Vec2>,
    pub house: Option<House>,
    pub inventory: Vec<InventoryItem>,
    pub prestige: i64,
}

/// Снимок игрока на момент Leave
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSave {
    pub account_key: String,
    pub position: Vec2,
    pub inventory: Vec<InventoryItem>,
    pub prestige: i64,
}

/// Хранилище сессий (реализуется снаружи: БД, файл, тестовый mock)
pub trait SessionStore: Send + Sync + 'static {
    fn load_session(&self, account_key: &str) -> Result<SessionRecord, PersistenceError>;

    fn save_session(&self, save: SessionSave) -> Result<(), PersistenceError>;
}

/// Хранилище в памяти (headless binary, тесты)
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    records: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Заранее положить запись (seed аккаунта)
    pub fn insert(&self, account_key: impl Into<String>, record: SessionRecord) -> Result<(), PersistenceError> {
        let mut records = self
            .records
            .write()
            .map_err(|err| PersistenceError::Unavailable(err.to_string()))?;
        records.insert(account_key.into(), record);
        Ok(())
    }

    pub fn get(&self, account_key: &str) -> Option<SessionRecord> {
        self.records.read().ok()?.get(account_key).cloned()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load_session(&self, account_key: &str) -> Result<SessionRecord, PersistenceError> {
        let records = self
            .records
            .read()
            .map_err(|err| PersistenceError::Unavailable(err.to_string()))?;
        records
            .get(account_key)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(account_key.to_string()))
    }

    fn save_session(&self, save: SessionSave) -> Result<(), PersistenceError> {
        let mut records = self
            .records
            .write()
            .map_err(|err| PersistenceError::Unavailable(err.to_string()))?;
        let record = records.entry(save.account_key).or_default();
        record.position = Some(save.position);
        record.inventory = save.inventory;
        record.prestige = save.prestige;
        Ok(())
    }
}

/// Resource: текущее хранилище сессий
#[derive(Resource, Clone)]
pub struct SessionStoreHandle(pub Arc<dyn SessionStore>);

impl Default for SessionStoreHandle {
    fn default() -> Self {
        Self(Arc::new(InMemorySessionStore::new()))
    }
}

impl SessionStoreHandle {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self(store)
    }

    /// Загрузка на Join: ошибка → лог + значения по умолчанию
    pub fn load_or_default(&self, account_key: &str) -> SessionRecord {
        match self.0.load_session(account_key) {
            Ok(record) => record,
            Err(PersistenceError::NotFound(_)) => {
                crate::log(&format!("💾 No stored session for {}, starting fresh", account_key));
                SessionRecord::default()
            }
            Err(err) => {
                log_error(&format!("💾 Failed to load session {}: {}", account_key, err));
                SessionRecord::default()
            }
        }
    }

    /// Сохранение на Leave: detached задача на IoTaskPool
    pub fn save_in_background(&self, save: SessionSave) {
        let store = Arc::clone(&self.0);
        IoTaskPool::get_or_init(TaskPool::new)
            .spawn(async move {
                let account_key = save.account_key.clone();
                if let Err(err) = store.save_session(save) {
                    log_error(&format!("💾 Failed to save session {}: {}", account_key, err));
                }
            })
            .detach();
    }
}
