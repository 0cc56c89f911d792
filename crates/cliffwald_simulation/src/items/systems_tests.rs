//! Tests for item spawning and collection.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::systems::{collect_card, process_collect_requests, seed_initial_items, spawn_items, CardCollection};
    use super::super::{CollectRequested, ItemCollected, ItemConfig, ItemSpawnTimer, WorldItems};
    use crate::components::{ground_to_world, Character, House, Inventory, Prestige, RoutineSpots, SessionTag, StudentSlot};
    use crate::level::SchoolLayout;
    use crate::prestige::HousePoints;
    use crate::simulation::SimClock;
    use crate::DeterministicRng;

    fn item_app() -> App {
        let mut app = App::new();
        app.add_event::<CollectRequested>()
            .add_event::<ItemCollected>()
            .init_resource::<ItemConfig>()
            .init_resource::<WorldItems>()
            .init_resource::<ItemSpawnTimer>()
            .init_resource::<SimClock>()
            .init_resource::<SchoolLayout>()
            .init_resource::<HousePoints>()
            .insert_resource(DeterministicRng::new(7))
            .add_systems(Update, (spawn_items, process_collect_requests).chain());
        app
    }

    fn tick(app: &mut App, delta_ms: f32) {
        app.world_mut().resource_mut::<SimClock>().advance(delta_ms, 3);
        app.update();
    }

    fn spawn_student(app: &mut App, position: Vec2) -> Entity {
        let spots = RoutineSpots {
            sleep: position,
            class: position,
            eat: position,
        };
        app.world_mut()
            .spawn((
                Character {
                    numeric_id: 1,
                    display_name: "Alice".into(),
                    skin: "student".into(),
                },
                SessionTag("sess_a".into()),
                StudentSlot {
                    slot_id: "student_vesper_1".into(),
                    seat_index: 0,
                    house: House::Vesper,
                    routine: spots,
                    echo_name: "Echo".into(),
                    echo_skin: "student".into(),
                },
                Transform::from_translation(ground_to_world(position)),
            ))
            .id()
    }

    fn drain_collected(app: &mut App) -> Vec<ItemCollected> {
        app.world_mut()
            .resource_mut::<Events<ItemCollected>>()
            .drain()
            .collect()
    }

    #[test]
    fn test_collect_card_new_then_duplicate() {
        let mut inventory = Inventory::default();

        assert_eq!(collect_card(&mut inventory, 3), CardCollection::New);
        assert_eq!(collect_card(&mut inventory, 3), CardCollection::Duplicate);
        assert_eq!(collect_card(&mut inventory, 4), CardCollection::New);

        let ids: Vec<&str> = inventory.0.iter().map(|item| item.item_id.as_str()).collect();
        assert_eq!(ids, vec!["card_3", "card_4"]);
        assert!(inventory.0.iter().all(|item| item.count == 1));
    }

    #[test]
    fn test_spawn_after_interval_elapses() {
        let mut app = item_app();

        tick(&mut app, 30_000.0);
        tick(&mut app, 30_000.0);
        // Ровно 60 сек: ещё рано
        assert!(app.world().resource::<WorldItems>().is_empty());

        tick(&mut app, 30_000.0);
        let items = app.world().resource::<WorldItems>();
        assert_eq!(items.len(), 1);
        let (_, item) = items.iter().next().unwrap();
        assert!((1..=16).contains(&item.card_id));
        assert_eq!(app.world().resource::<ItemSpawnTimer>().0, 0.0);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut app = item_app();
        {
            let mut items = app.world_mut().resource_mut::<WorldItems>();
            for card_id in 1..=10 {
                items.spawn(card_id, Vec2::new(100.0 * card_id as f32, 100.0));
            }
        }

        tick(&mut app, 61_000.0);

        assert_eq!(app.world().resource::<WorldItems>().len(), 10);
        // Таймер сброшен, хотя карточка не появилась
        assert_eq!(app.world().resource::<ItemSpawnTimer>().0, 0.0);
    }

    #[test]
    fn test_initial_items_near_spawn_points() {
        let mut app = item_app();
        app.add_systems(Startup, seed_initial_items);

        tick(&mut app, 10.0);

        let layout = SchoolLayout::default();
        let scatter = ItemConfig::default().scatter;
        let items = app.world().resource::<WorldItems>();
        assert_eq!(items.len(), 5);
        for (_, item) in items.iter() {
            let near_anchor = layout.item_spawn_points().iter().any(|anchor| {
                (item.position.x - anchor.x).abs() <= scatter + 0.01
                    && (item.position.y - anchor.y).abs() <= scatter + 0.01
            });
            assert!(near_anchor, "карточка далеко от точек появления: {:?}", item.position);
        }
    }

    #[test]
    fn test_pickup_new_card_goes_to_inventory() {
        let mut app = item_app();
        let student = spawn_student(&mut app, Vec2::new(100.0, 100.0));
        let item = app.world_mut().resource_mut::<WorldItems>().spawn(7, Vec2::new(150.0, 100.0));

        app.world_mut().send_event(CollectRequested { collector: student, item });
        tick(&mut app, 10.0);

        let collected = drain_collected(&mut app);
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].collector_key, "sess_a");
        assert_eq!(collected[0].card_id, 7);
        assert!(!collected[0].duplicate);
        assert_eq!(collected[0].reward, 0);

        assert!(app.world().resource::<WorldItems>().get(item).is_none());
        let inventory = app.world().get::<Inventory>(student).unwrap();
        assert_eq!(inventory.0[0].item_id, "card_7");
        assert_eq!(app.world().get::<Prestige>(student).unwrap().0, 0);
    }

    #[test]
    fn test_duplicate_card_awards_prestige() {
        let mut app = item_app();
        let student = spawn_student(&mut app, Vec2::new(100.0, 100.0));
        let first = app.world_mut().resource_mut::<WorldItems>().spawn(2, Vec2::new(100.0, 120.0));
        let second = app.world_mut().resource_mut::<WorldItems>().spawn(2, Vec2::new(80.0, 100.0));

        app.world_mut().send_event(CollectRequested { collector: student, item: first });
        app.world_mut().send_event(CollectRequested { collector: student, item: second });
        tick(&mut app, 10.0);

        let collected = drain_collected(&mut app);
        assert_eq!(collected.len(), 2);
        assert!(!collected[0].duplicate);
        assert!(collected[1].duplicate);
        assert_eq!(collected[1].reward, 5);

        assert_eq!(app.world().get::<Inventory>(student).unwrap().0.len(), 1);
        assert_eq!(app.world().get::<Prestige>(student).unwrap().0, 5);
        assert_eq!(app.world().resource::<HousePoints>().get(House::Vesper), 5);
        assert!(app.world().resource::<WorldItems>().is_empty());
    }

    #[test]
    fn test_pickup_out_of_range_is_ignored() {
        let mut app = item_app();
        let student = spawn_student(&mut app, Vec2::new(100.0, 100.0));
        // Ровно радиус подбора: слишком далеко
        let item = app.world_mut().resource_mut::<WorldItems>().spawn(5, Vec2::new(160.0, 100.0));

        app.world_mut().send_event(CollectRequested { collector: student, item });
        tick(&mut app, 10.0);

        assert!(drain_collected(&mut app).is_empty());
        assert!(app.world().resource::<WorldItems>().get(item).is_some());
        assert!(app.world().get::<Inventory>(student).unwrap().0.is_empty());
    }

    #[test]
    fn test_item_collected_only_once() {
        let mut app = item_app();
        let student = spawn_student(&mut app, Vec2::new(100.0, 100.0));
        let item = app.world_mut().resource_mut::<WorldItems>().spawn(9, Vec2::new(100.0, 100.0));

        app.world_mut().send_event(CollectRequested { collector: student, item });
        app.world_mut().send_event(CollectRequested { collector: student, item });
        tick(&mut app, 10.0);

        assert_eq!(drain_collected(&mut app).len(), 1);
        assert_eq!(app.world().get::<Prestige>(student).unwrap().0, 0);
    }
}
