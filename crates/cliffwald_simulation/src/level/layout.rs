//! Ключевые точки школы (мировые координаты, пиксели)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::House;

/// Область свободного времени: центр + радиус дисперсии
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct RoamArea {
    pub center: Vec2,
    pub radius: f32,
}

/// Карта школы: общежития, столовая, зоны свободного времени
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolLayout {
    pub dorm_ignis: Vec2,
    pub dorm_axiom: Vec2,
    pub dorm_vesper: Vec2,
    pub great_hall: Vec2,
    /// Учебное крыло (точка появления карточек)
    pub academic_wing: Vec2,
    pub training_grounds: RoamArea,
    pub courtyard: RoamArea,
    pub forest: RoamArea,
}

impl Default for SchoolLayout {
    fn default() -> Self {
        Self {
            dorm_ignis: Vec2::new(576.0, 480.0),
            dorm_axiom: Vec2::new(576.0, 1120.0),
            dorm_vesper: Vec2::new(576.0, 1760.0),
            great_hall: Vec2::new(1600.0, 560.0),
            academic_wing: Vec2::new(1600.0, 1360.0),
            training_grounds: RoamArea {
                center: Vec2::new(2640.0, 1520.0),
                radius: 200.0,
            },
            courtyard: RoamArea {
                center: Vec2::new(1056.0, 1280.0),
                radius: 150.0,
            },
            forest: RoamArea {
                center: Vec2::new(1600.0, 2880.0),
                radius: 400.0,
            },
        }
    }
}

impl SchoolLayout {
    pub fn dorm(&self, house: House) -> Vec2 {
        match house {
            House::Ignis => self.dorm_ignis,
            House::Axiom => self.dorm_axiom,
            House::Vesper => self.dorm_vesper,
        }
    }

    /// Точки появления карточек: двор, лес, столовая, учебное крыло
    pub fn item_spawn_points(&self) -> [Vec2; 4] {
        [self.courtyard.center, self.forest.center, self.great_hall, self.academic_wing]
    }

    /// Правый нижний угол школы: максимум по всем точкам и зонам (с радиусом)
    pub fn extent(&self) -> Vec2 {
        let points = [
            self.dorm_ignis,
            self.dorm_axiom,
            self.dorm_vesper,
            self.great_hall,
            self.academic_wing,
        ];
        let areas = [self.training_grounds, self.courtyard, self.forest];

        points
            .into_iter()
            .chain(areas.into_iter().map(|area| area.center + Vec2::splat(area.radius.max(0.0))))
            .fold(Vec2::ZERO, Vec2::max)
    }
}
