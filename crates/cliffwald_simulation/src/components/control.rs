//! Control: кто управляет телом персонажа
//!
//! Possession — жёсткая замена варианта, не overlay:
//! `Echo(EchoMind)` (AI) ⇄ `Possessed(PlayerLink)` (клиент).
//! Переход = один `insert` нового Control на ту же Entity, тело не трогается.

use bevy::prelude::*;

use crate::ai::EchoMind;

/// Сессия клиента, управляющая телом
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLink {
    /// Сетевой id сессии (ключ apply_input / request_cast)
    pub session_id: String,
    /// Ключ записи в persistence
    pub account_key: String,
}

#[derive(Component, Debug, Clone)]
pub enum Control {
    Echo(EchoMind),
    Possessed(PlayerLink),
}

impl Control {
    pub fn is_echo(&self) -> bool {
        matches!(self, Control::Echo(_))
    }

    pub fn is_possessed(&self) -> bool {
        matches!(self, Control::Possessed(_))
    }

    pub fn mind(&self) -> Option<&EchoMind> {
        match self {
            Control::Echo(mind) => Some(mind),
            Control::Possessed(_) => None,
        }
    }

    pub fn mind_mut(&mut self) -> Option<&mut EchoMind> {
        match self {
            Control::Echo(mind) => Some(mind),
            Control::Possessed(_) => None,
        }
    }

    pub fn player_link(&self) -> Option<&PlayerLink> {
        match self {
            Control::Possessed(link) => Some(link),
            Control::Echo(_) => None,
        }
    }
}
