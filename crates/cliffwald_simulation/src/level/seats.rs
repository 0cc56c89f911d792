//! Seat Registry: кровати, парты, места в столовой
//!
//! Индекс места = numeric_id - 1. Если уровень не задал место,
//! позиция вычисляется детерминированной формацией (никогда не пусто).

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::layout::SchoolLayout;
use crate::components::{House, RoutineSpots};

/// Кроватей в ряду общежития (и студентов на факультет)
pub const STUDENTS_PER_HOUSE: u32 = 8;

const BED_SPACING: f32 = 64.0;
const FOOD_SPACING: f32 = 32.0;
const FOOD_ROW_OFFSET: f32 = 64.0;
const CLASS_ORIGIN: Vec2 = Vec2::new(1440.0, 1312.0);
const CLASS_COLUMN_STEP: f32 = 96.0;
const CLASS_ROW_STEP: f32 = 64.0;
const CLASS_SEATS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatKind {
    Bed,
    Class,
    Food,
}

impl SeatKind {
    /// Тип объекта в слое FixedSeats
    pub fn from_object_type(kind: &str) -> Option<SeatKind> {
        match kind {
            "bed" => Some(SeatKind::Bed),
            "seat_class" => Some(SeatKind::Class),
            "seat_food" => Some(SeatKind::Food),
            _ => None,
        }
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SeatRegistry {
    beds: BTreeMap<u32, Vec2>,
    class_seats: BTreeMap<u32, Vec2>,
    food_seats: BTreeMap<u32, Vec2>,
}

impl SeatRegistry {
    pub fn insert(&mut self, kind: SeatKind, index: u32, position: Vec2) {
        self.map_mut(kind).insert(index, position);
    }

    pub fn get(&self, kind: SeatKind, index: u32) -> Option<Vec2> {
        self.map(kind).get(&index).copied()
    }

    pub fn len(&self, kind: SeatKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.beds.is_empty() && self.class_seats.is_empty() && self.food_seats.is_empty()
    }

    fn map(&self, kind: SeatKind) -> &BTreeMap<u32, Vec2> {
        match kind {
            SeatKind::Bed => &self.beds,
            SeatKind::Class => &self.class_seats,
            SeatKind::Food => &self.food_seats,
        }
    }

    fn map_mut(&mut self, kind: SeatKind) -> &mut BTreeMap<u32, Vec2> {
        match kind {
            SeatKind::Bed => &mut self.beds,
            SeatKind::Class => &mut self.class_seats,
            SeatKind::Food => &mut self.food_seats,
        }
    }

    /// Точки расписания студента: место из уровня или формация
    pub fn routine_spots_for(&self, numeric_id: u32, house: House, layout: &SchoolLayout) -> RoutineSpots {
        let seat = numeric_id.saturating_sub(1);

        RoutineSpots {
            sleep: self
                .get(SeatKind::Bed, seat)
                .unwrap_or_else(|| bed_formation(numeric_id, house, layout)),
            class: self
                .get(SeatKind::Class, seat)
                .unwrap_or_else(|| class_formation(seat)),
            eat: self
                .get(SeatKind::Food, seat)
                .unwrap_or_else(|| food_formation(numeric_id, house, layout)),
        }
    }
}

/// Индекс студента внутри факультета (0..8)
fn index_in_house(numeric_id: u32) -> f32 {
    (numeric_id.saturating_sub(1) % STUDENTS_PER_HOUSE) as f32
}

/// Ряд из 8 кроватей по центру общежития
pub fn bed_formation(numeric_id: u32, house: House, layout: &SchoolLayout) -> Vec2 {
    let dorm = layout.dorm(house);
    Vec2::new(dorm.x + (index_in_house(numeric_id) - 3.5) * BED_SPACING, dorm.y)
}

/// Столы факультетов в Great Hall: ignis выше, vesper ниже
pub fn food_formation(numeric_id: u32, house: House, layout: &SchoolLayout) -> Vec2 {
    let row_offset = match house {
        House::Ignis => -FOOD_ROW_OFFSET,
        House::Axiom => 0.0,
        House::Vesper => FOOD_ROW_OFFSET,
    };
    Vec2::new(
        layout.great_hall.x + (index_in_house(numeric_id) - 3.5) * FOOD_SPACING,
        layout.great_hall.y + row_offset,
    )
}

/// Класс: 3 ряда × 4 парты × 2 места
pub fn class_formation(seat: u32) -> Vec2 {
    let seat = seat % CLASS_SEATS;
    let row = (seat / 8) as f32;
    let column = ((seat % 8) / 2) as f32;
    let side = (seat % 2) as f32;

    let table = CLASS_ORIGIN + Vec2::new(column * CLASS_COLUMN_STEP, row * CLASS_ROW_STEP);
    Vec2::new(table.x + 16.0 + side * 32.0, table.y + 40.0)
}
