//! NavGrid: маска проходимости уровня (tile grid)

use bevy::prelude::*;

/// Размер тайла по умолчанию (пиксели)
pub const DEFAULT_TILE_SIZE: f32 = 32.0;

/// Минимальный размер открытой сетки для degraded mode (уровень не загрузился)
///
/// 100×100 тайлов = 3200×3200 пикселей. Сетка пустого уровня растягивается
/// дальше, если точки школы выходят за этот квадрат (см. `open_covering`).
pub const FALLBACK_GRID_TILES: usize = 100;

fn sanitize_tile_size(tile_size: f32) -> f32 {
    if tile_size.is_finite() && tile_size > 0.0 {
        tile_size
    } else {
        DEFAULT_TILE_SIZE
    }
}

/// Маска проходимости: false = свободно, true = заблокировано
///
/// Строится один раз из collision геометрии уровня, дальше read-only.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct NavGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    blocked: Vec<bool>,
}

impl Default for NavGrid {
    fn default() -> Self {
        Self::open(FALLBACK_GRID_TILES, FALLBACK_GRID_TILES, DEFAULT_TILE_SIZE)
    }
}

impl NavGrid {
    /// Полностью свободная сетка
    pub fn open(width: usize, height: usize, tile_size: f32) -> Self {
        let tile_size = sanitize_tile_size(tile_size);

        Self {
            width,
            height,
            tile_size,
            blocked: vec![false; width * height],
        }
    }

    /// Открытая сетка, в которую гарантированно попадает `extent`
    ///
    /// Не меньше FALLBACK_GRID_TILES по каждой оси, плюс один тайл запаса.
    pub fn open_covering(extent: Vec2, tile_size: f32) -> Self {
        let tile_size = sanitize_tile_size(tile_size);
        let tiles = |span: f32| {
            let needed = if span.is_finite() && span > 0.0 {
                (span / tile_size).floor() as usize + 2
            } else {
                0
            };
            needed.max(FALLBACK_GRID_TILES)
        };
        Self::open(tiles(extent.x), tiles(extent.y), tile_size)
    }

    /// Сетка из строк `0 = свободно, 1 = стена`; рваные строки → None
    pub fn from_rows(rows: &[Vec<u8>], tile_size: f32) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }

        let mut grid = Self::open(width, height, tile_size);
        for (y, row) in rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if *cell != 0 {
                    grid.set_blocked(x, y, true);
                }
            }
        }
        Some(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// За пределами сетки — всегда заблокировано
    pub fn is_blocked(&self, x: isize, y: isize) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.blocked[y as usize * self.width + x as usize]
    }

    pub fn set_blocked(&mut self, x: usize, y: usize, blocked: bool) {
        if x < self.width && y < self.height {
            self.blocked[y * self.width + x] = blocked;
        }
    }

    /// Заблокировать все тайлы, которые задевает прямоугольник (мировые координаты)
    ///
    /// Диапазон: floor(left / tile) .. ceil(right / tile), обрезается по границам.
    pub fn block_rect(&mut self, min: Vec2, size: Vec2) {
        let ts = self.tile_size;
        let start_x = (min.x / ts).floor().max(0.0) as usize;
        let start_y = (min.y / ts).floor().max(0.0) as usize;
        let end_x = (((min.x + size.x) / ts).ceil().max(0.0) as usize).min(self.width);
        let end_y = (((min.y + size.y) / ts).ceil().max(0.0) as usize).min(self.height);

        for y in start_y..end_y {
            for x in start_x..end_x {
                self.set_blocked(x, y, true);
            }
        }
    }

    /// Мировая точка → тайл (floor); None если вне сетки или NaN
    pub fn world_to_tile(&self, point: Vec2) -> Option<(usize, usize)> {
        if !point.is_finite() {
            return None;
        }
        let x = (point.x / self.tile_size).floor();
        let y = (point.y / self.tile_size).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Центр тайла в мировых координатах
    pub fn tile_center(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            x as f32 * self.tile_size + self.tile_size / 2.0,
            y as f32 * self.tile_size + self.tile_size / 2.0,
        )
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }
}
