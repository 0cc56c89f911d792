//! Navigation: статическая маска проходимости + grid A*
//!
//! Pathfinder read-only: NavGrid строится один раз из level data и живёт
//! в World как Resource. AI запрашивает путь синхронно внутри тика.

pub mod astar;
pub mod grid;


pub use astar::{find_path, octile_distance};
pub use grid::{NavGrid, DEFAULT_TILE_SIZE};
