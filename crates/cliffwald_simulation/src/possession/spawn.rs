//! Заселение школы: стены, студенты (Echo слоты), преподаватели
//!
//! Студенты: 3 факультета × students_per_house, numeric id сквозной с 1,
//! появляются на своей кровати. Все студенты попадают в EchoRoster
//! в порядке создания. Преподаватели — статичные Echo вне ростера.

use bevy::prelude::*;

use super::{EchoRoster, SessionIndex, SpawnConfig};
use crate::ai::EchoMind;
use crate::components::{Character, Control, House, SessionTag, StudentSlot};
use crate::level::{LevelData, NpcSpawn, SchoolLayout};
use crate::movement::{character_body, wall_body, MovementConfig};
use crate::navigation::NavGrid;
use crate::log_info;

/// Преподаватель по умолчанию (если в карте нет слоя NPCs)
#[derive(Debug, Clone, Copy)]
pub struct LegacyTeacher {
    pub position: Vec2,
    pub name: &'static str,
}

pub const LEGACY_TEACHERS: [LegacyTeacher; 5] = [
    LegacyTeacher { position: Vec2::new(1584.0, 1250.0), name: "Professor Hecate" },
    LegacyTeacher { position: Vec2::new(1600.0, 1600.0), name: "Headmaster Aris" },
    LegacyTeacher { position: Vec2::new(1300.0, 1300.0), name: "Caretaker Filch" },
    LegacyTeacher { position: Vec2::new(600.0, 1000.0), name: "Matron Pomfrey" },
    LegacyTeacher { position: Vec2::new(1600.0, 2880.0), name: "Baba Yaga" },
];

const TEACHER_SKIN: &str = "teacher";

pub fn student_skin(house: House) -> &'static str {
    match house {
        House::Ignis => "player_red",
        House::Axiom => "player_blue",
        House::Vesper => "player_idle",
    }
}

/// Итог заселения
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Population {
    pub walls: usize,
    pub students: usize,
    pub teachers: usize,
}

/// Заселить мир по данным уровня
///
/// Вставляет NavGrid уровня как resource. Вызывается один раз при старте,
/// до первого тика.
pub fn populate_world(world: &mut World, level: &LevelData) -> Population {
    let spawn = world.get_resource::<SpawnConfig>().cloned().unwrap_or_default();
    let movement = world.get_resource::<MovementConfig>().cloned().unwrap_or_default();
    let layout = world.get_resource::<SchoolLayout>().cloned().unwrap_or_default();

    world.insert_resource(level.nav.clone());
    world.init_resource::<SessionIndex>();
    world.init_resource::<EchoRoster>();

    let mut population = Population::default();

    // 1. Стены
    for wall in &level.walls {
        world.spawn(wall_body(wall));
        population.walls += 1;
    }

    // 2. Студенты
    let mut numeric_id = 0;
    for house in House::ALL {
        for n in 1..=spawn.students_per_house {
            numeric_id += 1;
            let slot_id = format!("student_{}_{}", house.as_str(), n);
            let echo_name = format!("{} Student {}", house.title(), n);
            let routine = level.seats.routine_spots_for(numeric_id, house, &layout);
            let bed = routine.sleep;

            let entity = world
                .spawn((
                    Character {
                        numeric_id,
                        display_name: echo_name.clone(),
                        skin: student_skin(house).to_string(),
                    },
                    SessionTag(slot_id.clone()),
                    StudentSlot {
                        slot_id: slot_id.clone(),
                        seat_index: numeric_id - 1,
                        house,
                        routine,
                        echo_name,
                        echo_skin: student_skin(house).to_string(),
                    },
                    Control::Echo(EchoMind::new(bed, Some(house), Some(routine))),
                    character_body(bed, &movement),
                ))
                .id();

            world.resource_mut::<SessionIndex>().insert(slot_id, entity);
            world.resource_mut::<EchoRoster>().push(entity);
            population.students += 1;
        }
    }

    // 3. Преподаватели (слой NPCs или legacy)
    let teachers: Vec<NpcSpawn> = if level.npcs.is_empty() {
        LEGACY_TEACHERS
            .iter()
            .enumerate()
            .map(|(i, t)| NpcSpawn {
                id: i as u32,
                position: t.position,
                name: t.name.to_string(),
                skin: TEACHER_SKIN.to_string(),
            })
            .collect()
    } else {
        level.npcs.clone()
    };
    let legacy = level.npcs.is_empty();

    for npc in teachers {
        numeric_id += 1;
        let key = if legacy {
            format!("teacher_legacy_{}", npc.id)
        } else {
            format!("teacher_{}", npc.id)
        };
        if world.resource::<SessionIndex>().contains(&key) {
            crate::log_warning(&format!("Duplicate NPC id {}, skipping", key));
            continue;
        }

        let entity = world
            .spawn((
                Character {
                    numeric_id,
                    display_name: npc.name.clone(),
                    skin: npc.skin.clone(),
                },
                SessionTag(key.clone()),
                Control::Echo(EchoMind::stationary(npc.position)),
                character_body(npc.position, &movement),
            ))
            .id();
        world.resource_mut::<SessionIndex>().insert(key, entity);
        population.teachers += 1;
    }

    let nav = world.resource::<NavGrid>();
    log_info(&format!(
        "School populated: {} students, {} teachers, {} walls (nav {}x{})",
        population.students,
        population.teachers,
        population.walls,
        nav.width(),
        nav.height()
    ));

    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Facing;

    #[test]
    fn test_populate_empty_level() {
        let mut world = World::new();
        let population = populate_world(&mut world, &LevelData::empty());

        assert_eq!(population, Population { walls: 0, students: 24, teachers: 5 });
        assert_eq!(world.resource::<EchoRoster>().len(), 24);
        assert_eq!(world.resource::<SessionIndex>().len(), 29);

        let index = world.resource::<SessionIndex>();
        let first = index.get("student_ignis_1").unwrap();
        let last = index.get("student_vesper_8").unwrap();
        let hecate = index.get("teacher_legacy_0").unwrap();

        let character = world.get::<Character>(last).unwrap();
        assert_eq!(character.numeric_id, 24);
        assert_eq!(character.display_name, "Vesper Student 8");
        assert_eq!(character.skin, "player_idle");

        // Required components
        assert!(world.get::<Facing>(first).is_some());

        // Преподаватель: без слота, без расписания
        assert!(world.get::<StudentSlot>(hecate).is_none());
        let mind = world.get::<Control>(hecate).unwrap().mind().unwrap();
        assert!(mind.routine.is_none());
        assert!(!world.resource::<EchoRoster>().contains(hecate));
    }

    #[test]
    fn test_roster_in_creation_order() {
        let mut world = World::new();
        populate_world(&mut world, &LevelData::empty());

        let oldest = world.resource::<EchoRoster>().iter().next().unwrap();
        let slot = world.get::<StudentSlot>(oldest).unwrap();
        assert_eq!(slot.slot_id, "student_ignis_1");
        assert_eq!(slot.seat_index, 0);
    }
}
