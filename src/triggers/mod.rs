//! Triggers domain: sensor zones that hand contacts to the controller or session.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use std::collections::HashSet;

use crate::content::ZoneKind;
use crate::core::{ActionScheduler, GameState, PresentationEvent, PresentationMessage};
use crate::movement::{CharacterController, Player};
use crate::session::{LevelSession, SessionCoordinator};

#[cfg(test)]
mod tests;

#[derive(Component, Debug, Clone, PartialEq)]
pub enum TriggerZone {
    Death,
    Diamond,
    Checkpoint,
    Door { destination: usize },
    Hazard { power: Option<Vec2> },
}

impl From<&ZoneKind> for TriggerZone {
    fn from(kind: &ZoneKind) -> Self {
        match kind {
            ZoneKind::Death => TriggerZone::Death,
            ZoneKind::Diamond => TriggerZone::Diamond,
            ZoneKind::Checkpoint => TriggerZone::Checkpoint,
            ZoneKind::Door { destination } => TriggerZone::Door {
                destination: *destination,
            },
            ZoneKind::Hazard { power } => TriggerZone::Hazard {
                power: power.map(|p| p.to_vec2()),
            },
        }
    }
}

/// What the host should do with the zone and player after a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneOutcome {
    /// Nothing changed.
    Ignored,
    /// The zone stays and nothing else to do.
    Kept,
    /// The zone was used up and should be despawned.
    Consumed,
    /// A checkpoint was (re)activated.
    Activated,
    /// The player died and should be despawned.
    Killed,
}

/// Apply a player's contact with `zone` located at `zone_position`.
pub fn apply_zone_contact(
    zone: &TriggerZone,
    zone_position: Vec2,
    controller: &mut CharacterController,
    scheduler: &mut ActionScheduler,
    events: &mut Vec<PresentationEvent>,
    session: &mut LevelSession,
) -> ZoneOutcome {
    if controller.is_destroyed() {
        return ZoneOutcome::Ignored;
    }

    match zone {
        TriggerZone::Death => {
            controller.die(scheduler, events, session);
            ZoneOutcome::Killed
        }
        TriggerZone::Diamond => {
            session.add_collectible();
            ZoneOutcome::Consumed
        }
        TriggerZone::Checkpoint => {
            if session.activate_checkpoint(zone_position) {
                ZoneOutcome::Activated
            } else {
                ZoneOutcome::Ignored
            }
        }
        TriggerZone::Door { destination } => {
            if controller.door_in(*destination, scheduler, events) {
                session.open_entrance_door();
                ZoneOutcome::Kept
            } else {
                ZoneOutcome::Ignored
            }
        }
        TriggerZone::Hazard { power } => {
            if controller.knockback_with_power(zone_position.x, *power, scheduler, events) {
                ZoneOutcome::Kept
            } else {
                ZoneOutcome::Ignored
            }
        }
    }
}

pub(crate) const CHECKPOINT_ACTIVE_COLOR: Color = Color::srgb(0.3, 0.9, 0.4);

pub(crate) fn handle_trigger_contacts(
    mut commands: Commands,
    mut collisions: MessageReader<CollisionStart>,
    mut scheduler: ResMut<ActionScheduler>,
    mut session: ResMut<LevelSession>,
    mut presentation: MessageWriter<PresentationMessage>,
    mut players: Query<(&mut CharacterController, &Transform), With<Player>>,
    zones: Query<(&TriggerZone, &Transform)>,
    mut zone_sprites: Query<&mut Sprite, With<TriggerZone>>,
) {
    let mut consumed = HashSet::new();
    let mut events: Vec<PresentationEvent> = Vec::new();

    for event in collisions.read() {
        for (player_entity, zone_entity) in [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ] {
            let Ok((mut controller, player_transform)) = players.get_mut(player_entity) else {
                continue;
            };
            let Ok((zone, transform)) = zones.get(zone_entity) else {
                continue;
            };
            if consumed.contains(&zone_entity) {
                continue;
            }

            controller.sync_position(player_transform.translation.truncate());
            let outcome = apply_zone_contact(
                zone,
                transform.translation.truncate(),
                &mut controller,
                &mut scheduler,
                &mut events,
                &mut session,
            );

            for presentation_event in events.drain(..) {
                presentation.write(PresentationMessage {
                    body: player_entity,
                    event: presentation_event,
                });
            }

            match outcome {
                ZoneOutcome::Killed => {
                    commands.entity(player_entity).despawn();
                }
                ZoneOutcome::Consumed => {
                    consumed.insert(zone_entity);
                    commands.entity(zone_entity).despawn();
                }
                ZoneOutcome::Activated => {
                    if let Ok(mut sprite) = zone_sprites.get_mut(zone_entity) {
                        sprite.color = CHECKPOINT_ACTIVE_COLOR;
                    }
                }
                ZoneOutcome::Kept | ZoneOutcome::Ignored => {}
            }
        }
    }
}

pub struct TriggersPlugin;

impl Plugin for TriggersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_trigger_contacts.run_if(in_state(GameState::Playing)),
        );
    }
}
