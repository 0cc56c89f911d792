//! AI systems (поведение Echo)

pub mod duel;
pub mod echo;
pub mod routine;
pub mod steering;

// Re-export all systems
pub use duel::*;
pub use echo::*;
pub use routine::*;
pub use steering::*;
