//! AI components

pub mod config;
pub mod mind;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod mind_tests;

// Re-export all components
pub use config::*;
pub use mind::*;
