//! Level domain: tests for level helpers.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use super::{ActiveLevel, process_scene_requests, resolve_destination};
use crate::content::{LevelDef, LevelRegistry, ZoneKind};
use crate::core::GameState;
use crate::session::{LevelSession, SessionCoordinator};

#[test]
fn test_resolve_destination_keeps_valid_scene() {
    assert_eq!(resolve_destination(0, 3), 0);
    assert_eq!(resolve_destination(2, 3), 2);
}

#[test]
fn test_resolve_destination_wraps_past_last_level() {
    assert_eq!(resolve_destination(3, 3), 0);
    assert_eq!(resolve_destination(99, 1), 0);
}

#[test]
fn test_fallback_level_is_playable() {
    let level = LevelDef::fallback();
    assert!(!level.solids.is_empty());
    assert_eq!(level.diamond_count(), 1);
    assert!(level.zones.iter().any(|zone| zone.kind == ZoneKind::Death));

    let registry = LevelRegistry::new(vec![level]);
    assert_eq!(registry.len(), 1);
    assert!(registry.get(0).is_some());
    assert!(registry.get(1).is_none());
}

#[test]
fn test_scene_request_selects_level_and_enters_transition() {
    let mut world = World::new();
    let mut session = LevelSession::default();
    session.request_scene_transition(7);
    world.insert_resource(session);
    world.insert_resource(LevelRegistry::new(vec![
        LevelDef::fallback(),
        LevelDef::fallback(),
    ]));
    world.insert_resource(ActiveLevel { index: 1 });
    world.init_resource::<NextState<GameState>>();

    world.run_system_once(process_scene_requests).unwrap();

    assert_eq!(world.resource::<ActiveLevel>().index, 0);
    assert!(matches!(
        *world.resource::<NextState<GameState>>(),
        NextState::Pending(GameState::Transition)
    ));
    assert!(
        world
            .resource_mut::<LevelSession>()
            .take_scene_requests()
            .is_empty()
    );
}

#[test]
fn test_no_scene_request_leaves_level_alone() {
    let mut world = World::new();
    world.insert_resource(LevelSession::default());
    world.insert_resource(LevelRegistry::new(vec![LevelDef::fallback()]));
    world.insert_resource(ActiveLevel { index: 0 });
    world.init_resource::<NextState<GameState>>();

    world.run_system_once(process_scene_requests).unwrap();

    assert!(matches!(
        *world.resource::<NextState<GameState>>(),
        NextState::Unchanged
    ));
}
