//! Triggers domain: tests for zone contacts.

use bevy::prelude::*;

use super::{TriggerZone, ZoneOutcome, apply_zone_contact};
use crate::content::ZoneKind;
use crate::core::{ActionOwner, ActionScheduler, BodyId, PresentationEvent};
use crate::movement::{CharacterController, Impulse, MovementTuning};
use crate::session::{LevelSession, SessionCoordinator, SessionTuning};

struct Scene {
    controller: CharacterController,
    scheduler: ActionScheduler,
    events: Vec<PresentationEvent>,
    session: LevelSession,
}

impl Scene {
    fn new() -> Self {
        let mut scheduler = ActionScheduler::new();
        let mut events: Vec<PresentationEvent> = Vec::new();
        let controller = CharacterController::spawn(
            BodyId(9),
            MovementTuning::default(),
            Vec2::ZERO,
            true,
            &mut scheduler,
            &mut events,
        )
        .unwrap();
        let mut session = LevelSession::new(SessionTuning {
            seed: Some(1),
            ..default()
        });
        session.begin_level(0, Vec2::ZERO, 2, &mut scheduler);
        events.clear();
        Self {
            controller,
            scheduler,
            events,
            session,
        }
    }

    fn touch(&mut self, zone: TriggerZone, at: Vec2) -> ZoneOutcome {
        apply_zone_contact(
            &zone,
            at,
            &mut self.controller,
            &mut self.scheduler,
            &mut self.events,
            &mut self.session,
        )
    }
}

#[test]
fn test_death_zone_kills_and_schedules_respawn() {
    let mut scene = Scene::new();
    let outcome = scene.touch(TriggerZone::Death, Vec2::ZERO);

    assert_eq!(outcome, ZoneOutcome::Killed);
    assert!(scene.controller.is_destroyed());
    assert!(scene.session.is_respawn_pending());
    assert_eq!(scene.scheduler.pending_for(ActionOwner::Session), 1);
    assert!(matches!(
        scene.events.as_slice(),
        [PresentationEvent::DeathVfxSpawned { .. }]
    ));
}

#[test]
fn test_diamond_is_consumed_and_counted() {
    let mut scene = Scene::new();
    assert_eq!(
        scene.touch(TriggerZone::Diamond, Vec2::ZERO),
        ZoneOutcome::Consumed
    );
    assert_eq!(scene.session.diamonds_collected(), 1);
}

#[test]
fn test_checkpoint_activates_once() {
    let mut scene = Scene::new();
    let at = Vec2::new(200.0, 0.0);
    assert_eq!(
        scene.touch(TriggerZone::Checkpoint, at),
        ZoneOutcome::Activated
    );
    assert_eq!(scene.touch(TriggerZone::Checkpoint, at), ZoneOutcome::Ignored);
    assert_eq!(scene.session.checkpoint_position(), Some(at));
}

#[test]
fn test_door_enters_and_opens_entrance() {
    let mut scene = Scene::new();
    let door = TriggerZone::Door { destination: 1 };

    assert_eq!(scene.touch(door.clone(), Vec2::ZERO), ZoneOutcome::Kept);
    assert!(scene.controller.door_entered());
    assert!(scene.session.is_entrance_door_open());
    assert_eq!(
        scene.events,
        vec![PresentationEvent::Idle, PresentationEvent::DoorIn]
    );

    assert_eq!(scene.touch(door, Vec2::ZERO), ZoneOutcome::Ignored);
}

#[test]
fn test_hazard_knocks_away_with_override_power() {
    let mut scene = Scene::new();
    let power = Vec2::new(500.0, 200.0);
    let outcome = scene.touch(
        TriggerZone::Hazard { power: Some(power) },
        Vec2::new(30.0, 0.0),
    );

    assert_eq!(outcome, ZoneOutcome::Kept);
    assert!(scene.controller.is_knocked_back());
    assert_eq!(scene.controller.velocity(), Vec2::new(-500.0, 200.0));
}

#[test]
fn test_destroyed_player_triggers_nothing() {
    let mut scene = Scene::new();
    scene.touch(TriggerZone::Death, Vec2::ZERO);

    assert_eq!(
        scene.touch(TriggerZone::Diamond, Vec2::ZERO),
        ZoneOutcome::Ignored
    );
    assert_eq!(scene.session.diamonds_collected(), 0);
}

#[test]
fn test_zone_kind_conversion() {
    assert_eq!(
        TriggerZone::from(&ZoneKind::Door { destination: 4 }),
        TriggerZone::Door { destination: 4 }
    );
    assert_eq!(
        TriggerZone::from(&ZoneKind::Hazard {
            power: Some(Impulse::new(1.0, 2.0))
        }),
        TriggerZone::Hazard {
            power: Some(Vec2::new(1.0, 2.0))
        }
    );
    assert_eq!(
        TriggerZone::from(&ZoneKind::Hazard { power: None }),
        TriggerZone::Hazard { power: None }
    );
}
