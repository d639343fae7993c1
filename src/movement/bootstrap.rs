//! Movement domain: player spawning from session requests.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::core::{ActionScheduler, BodyId, PresentationEvent, PresentationMessage, SpawnPlayerRequest};
use crate::movement::{CharacterController, GameLayer, MovementTuning, Player};

pub const PLAYER_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
pub const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 48.0);

/// Spawn a player body for each [`SpawnPlayerRequest`], at most one alive at a time.
pub(crate) fn spawn_requested_players(
    mut commands: Commands,
    mut requests: MessageReader<SpawnPlayerRequest>,
    tuning: Res<MovementTuning>,
    mut scheduler: ResMut<ActionScheduler>,
    mut presentation: MessageWriter<PresentationMessage>,
    existing_player: Query<&CharacterController, With<Player>>,
) {
    let mut alive = existing_player.iter().any(|c| !c.is_destroyed());

    for request in requests.read() {
        if alive {
            info!("Player already exists, skipping spawn");
            continue;
        }

        let entity = commands.spawn_empty().id();
        let mut events: Vec<PresentationEvent> = Vec::new();
        let controller = match CharacterController::spawn(
            BodyId::from(entity),
            tuning.clone(),
            request.position,
            request.from_checkpoint,
            &mut scheduler,
            &mut events,
        ) {
            Ok(controller) => controller,
            Err(err) => {
                error!("Cannot spawn player: {}", err);
                commands.entity(entity).despawn();
                continue;
            }
        };

        info!(
            "Spawning player at {:?} (checkpoint={})",
            request.position, request.from_checkpoint
        );

        commands.entity(entity).insert((
            // Identity & Movement
            (Player, controller),
            // Rendering
            Sprite {
                color: PLAYER_COLOR,
                custom_size: Some(PLAYER_SIZE),
                ..default()
            },
            Transform::from_translation(request.position.extend(1.0)),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                Friction::new(0.0),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
                ),
            ),
        ));

        for event in events {
            presentation.write(PresentationMessage {
                body: entity,
                event,
            });
        }
        alive = true;
    }
}
