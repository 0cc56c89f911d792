//! Grid A* (8-connected)
//!
//! - ортогональный шаг = 1, диагональный = √2
//! - эвристика octile (admissible + consistent для 8-way сетки)
//! - диагональ запрещена, если любой из двух "угловых" тайлов заблокирован
//! - open set: BinaryHeap с lazy deletion (устаревшие записи пропускаются при pop)

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use bevy::prelude::*;

use super::grid::NavGrid;

/// 8 соседей: сначала ортогональные, потом диагональные (детерминированный порядок)
const NEIGHBORS: [(isize, isize); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Octile distance между тайлами
pub fn octile_distance(a: (usize, usize), b: (usize, usize)) -> f32 {
    let dx = a.0.abs_diff(b.0) as f32;
    let dy = a.1.abs_diff(b.1) as f32;
    (dx + dy) + (SQRT_2 - 2.0) * dx.min(dy)
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f32,
    g: f32,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // BinaryHeap — max-heap, поэтому сравнение инвертировано: меньший f выше.
    // При равном f предпочитаем больший g (ближе к цели), затем меньший index.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Найти путь между мировыми точками
///
/// Возвращает центры тайлов в порядке start → end, включая стартовый тайл.
/// None: любой конец вне сетки или на заблокированном тайле, либо цель недостижима.
pub fn find_path(grid: &NavGrid, start: Vec2, end: Vec2) -> Option<Vec<Vec2>> {
    let start_tile = grid.world_to_tile(start)?;
    let goal_tile = grid.world_to_tile(end)?;

    if grid.is_blocked(start_tile.0 as isize, start_tile.1 as isize)
        || grid.is_blocked(goal_tile.0 as isize, goal_tile.1 as isize)
    {
        return None;
    }

    let tiles = find_tile_path(grid, start_tile, goal_tile)?;
    Some(
        tiles
            .into_iter()
            .map(|(x, y)| grid.tile_center(x, y))
            .collect(),
    )
}

/// A* в координатах тайлов (концы уже проверены)
pub fn find_tile_path(
    grid: &NavGrid,
    start: (usize, usize),
    goal: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    let width = grid.width();
    let cell_count = width * grid.height();
    let to_index = |(x, y): (usize, usize)| y * width + x;
    let to_tile = |index: usize| (index % width, index / width);

    let start_index = to_index(start);
    let goal_index = to_index(goal);

    let mut g_score = vec![f32::INFINITY; cell_count];
    let mut parent: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();

    g_score[start_index] = 0.0;
    open.push(OpenEntry {
        f: octile_distance(start, goal),
        g: 0.0,
        index: start_index,
    });

    while let Some(current) = open.pop() {
        // Устаревшая запись (узел уже закрыт или найден путь короче)
        if closed[current.index] || current.g > g_score[current.index] {
            continue;
        }

        if current.index == goal_index {
            return Some(reconstruct(&parent, goal_index, to_tile));
        }
        closed[current.index] = true;

        let (cx, cy) = to_tile(current.index);
        let (cx, cy) = (cx as isize, cy as isize);

        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (cx + dx, cy + dy);
            if grid.is_blocked(nx, ny) {
                continue;
            }

            let diagonal = dx != 0 && dy != 0;
            // Срезание угла: оба ортогональных соседа должны быть свободны
            if diagonal && (grid.is_blocked(cx + dx, cy) || grid.is_blocked(cx, cy + dy)) {
                continue;
            }

            let neighbor = to_index((nx as usize, ny as usize));
            if closed[neighbor] {
                continue;
            }

            let step = if diagonal { SQRT_2 } else { 1.0 };
            let tentative = current.g + step;
            if tentative < g_score[neighbor] {
                g_score[neighbor] = tentative;
                parent[neighbor] = Some(current.index);
                open.push(OpenEntry {
                    f: tentative + octile_distance((nx as usize, ny as usize), goal),
                    g: tentative,
                    index: neighbor,
                });
            }
        }
    }

    None
}

/// Обратная цепочка parent'ов → путь start → goal
fn reconstruct(
    parent: &[Option<usize>],
    goal_index: usize,
    to_tile: impl Fn(usize) -> (usize, usize),
) -> Vec<(usize, usize)> {
    let mut path = vec![to_tile(goal_index)];
    let mut cursor = goal_index;
    while let Some(prev) = parent[cursor] {
        path.push(to_tile(prev));
        cursor = prev;
    }
    path.reverse();
    path
}

impl NavGrid {
    pub fn find_path(&self, start: Vec2, end: Vec2) -> Option<Vec<Vec2>> {
        find_path(self, start, end)
    }
}
