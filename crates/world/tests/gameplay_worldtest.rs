//! Worldtest: Player Gameplay Loop
//!
//! Validates:
//! - Placing a sapling registers a solid block the player cannot walk through
//! - Throwing an item spawns a floater that comes to rest out of reach
//! - Walking onto a resting floater picks it up exactly once
//! - Item totals are conserved across throw and pickup

use glam::Vec2;
use skafos_core::ItemKind;
use skafos_physics::BodyKind;
use skafos_testkit::{empty_world, EventRecord, JsonlSink};
use skafos_world::{EntityHandle, GameWorld, InputEvent, InputState, PointerButton, TileCoord};

const DT: f32 = 1.0 / 60.0;

fn walk_right() -> InputState {
    InputState {
        right: true,
        ..Default::default()
    }
}

fn place_at(world: &mut GameWorld, coord: TileCoord) -> usize {
    let report = world.update(
        &InputState::idle().with_event(InputEvent::PointerPress {
            button: PointerButton::Right,
            world_tile: Some(coord),
            slot: None,
        }),
        DT,
    );
    report.placed.len()
}

#[test]
fn sapling_blocks_movement_worldtest() {
    let log_path = std::env::temp_dir().join("skafos_sapling_blocks_movement.jsonl");
    let mut event_log = JsonlSink::create(&log_path).expect("create event log");

    let mut world = empty_world(5).expect("world");
    world.update(&InputState::idle(), DT);
    assert_eq!(world.collideables(), &[EntityHandle::Player]);

    world
        .player_mut()
        .inventory_mut()
        .add_item(ItemKind::Sapling, 2);
    world.update(&InputState::key('2'), DT);
    assert_eq!(place_at(&mut world, TileCoord::new(2, 0)), 1);
    assert_eq!(world.player().inventory().count_of(ItemKind::Sapling), 1);
    assert_eq!(world.collideables().len(), 2);
    event_log
        .write(&EventRecord {
            tick: world.tick(),
            kind: "SaplingPlaced",
            payload: "(2, 0)",
        })
        .expect("write event");

    let mut contacts = 0;
    for _ in 0..120 {
        let report = world.update(&walk_right(), DT);
        contacts += report.collisions.contacts.len();
        assert!(world.player().position.x <= 16.0 + f32::EPSILON);
    }
    assert!(contacts > 0);
    assert_eq!(world.player().position, Vec2::new(16.0, 0.0));
    event_log
        .write(&EventRecord {
            tick: world.tick(),
            kind: "PlayerBlocked",
            payload: &format!("{contacts} contacts"),
        })
        .expect("write event");

    let blocks = world
        .debug_bodies()
        .into_iter()
        .filter(|body| body.kind == BodyKind::Block)
        .count();
    assert_eq!(blocks, 1);
}

#[test]
fn throw_and_pick_up_worldtest() {
    let mut world = empty_world(6).expect("world");
    world.update(&InputState::idle(), DT);
    let total = world.total_item_count();
    assert_eq!(total, 10);

    let mut throw = InputState::key('q');
    throw.aim = Some(Vec2::new(200.0, 8.0));
    let report = world.update(&throw, DT);
    assert_eq!(report.thrown.len(), 1);
    let id = report.thrown[0];
    assert_eq!(world.player().inventory().count_of(ItemKind::Dirt), 9);

    // Let it settle; the player stands still and never touches it.
    for _ in 0..90 {
        let report = world.update(&InputState::idle(), DT);
        assert!(report.collisions.pickups.is_empty());
        assert_eq!(world.total_item_count(), total);
    }
    let floater = world.floaters().get(id).expect("floater alive");
    assert_eq!(floater.velocity, Vec2::ZERO);
    assert!(floater.position.x > 16.0);

    let mut pickups = 0;
    for _ in 0..60 {
        let report = world.update(&walk_right(), DT);
        pickups += report.collisions.pickups.len();
        assert_eq!(world.total_item_count(), total);
    }
    assert_eq!(pickups, 1);
    assert!(world.floaters().is_empty());
    assert_eq!(world.player().inventory().count_of(ItemKind::Dirt), 10);
    assert!(!world
        .collideables()
        .iter()
        .any(|handle| matches!(handle, EntityHandle::Floater { .. })));
}

#[test]
fn swing_and_run_toggle() {
    let mut world = empty_world(7).expect("world");
    let swing = InputState::idle().with_event(InputEvent::PointerPress {
        button: PointerButton::Left,
        world_tile: Some(TileCoord::new(3, 3)),
        slot: None,
    });
    world.update(&swing, DT);
    assert!(world.player().is_swinging());
    for _ in 0..20 {
        world.update(&InputState::idle(), DT);
    }
    assert!(!world.player().is_swinging());

    world.update(&InputState::idle().with_event(InputEvent::ToggleRun), DT);
    let start = world.player().position;
    for _ in 0..60 {
        world.update(&walk_right(), DT);
    }
    let travelled = world.player().position.x - start.x;
    assert!((travelled - 64.0).abs() < 0.01, "ran {travelled}px");
}
