//! ECS Components для персонажей школы
//!
//! Организация по доменам:
//! - character: идентичность персонажа (Character, SessionTag, StudentSlot, House)
//! - control: кто управляет телом (Control: Echo | Possessed)
//! - movement: намерение движения и направление взгляда (MoveIntent, Facing)
//! - progress: дуэльный счёт, prestige, inventory
//! - world: перевод 2D координат игры на плоскость XZ физики

pub mod character;
pub mod control;
pub mod movement;
pub mod progress;
pub mod world;

// Re-exports для удобного импорта
pub use character::*;
pub use control::*;
pub use movement::*;
pub use progress::*;
pub use world::*;
