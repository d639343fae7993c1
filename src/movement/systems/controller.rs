//! Movement domain: fixed-step driving of controllers and presentation output.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::core::{ActionOwner, ActionScheduler, PresentationEvent, PresentationMessage};
use crate::movement::systems::physics::SpatialPhysics;
use crate::movement::{
    CharacterController, ControllerContext, Facing, InputSource, MovementInput, PhysicsQuery,
    Player, VfxLifetime, PLAYER_COLOR,
};
use crate::session::LevelSession;

const KNOCKED_COLOR: Color = Color::srgb(1.0, 0.45, 0.45);
const DEATH_PUFF_SECS: f32 = 0.4;

/// Advance the simulation clock and route every action that came due.
pub(crate) fn run_scheduled_actions(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut scheduler: ResMut<ActionScheduler>,
    mut session: ResMut<LevelSession>,
    mut input: Option<ResMut<MovementInput>>,
    mut presentation: MessageWriter<PresentationMessage>,
    mut controllers: Query<(Entity, &mut CharacterController)>,
) {
    let fired = scheduler.advance(time.delta());
    if fired.is_empty() {
        return;
    }

    let physics = SpatialPhysics::new(&spatial_query);
    let mut events: Vec<PresentationEvent> = Vec::new();

    for fired_action in fired {
        let id = match fired_action.owner {
            ActionOwner::Session => {
                session.on_action(fired_action.action, &mut scheduler);
                continue;
            }
            ActionOwner::Body(id) => id,
        };

        let Some((entity, mut controller)) =
            controllers.iter_mut().find(|(_, controller)| controller.id() == id)
        else {
            debug!(
                "[ACTIONS] {:?} fired for a body that no longer exists",
                fired_action.action
            );
            continue;
        };

        let ctx = ControllerContext::new(
            input.as_deref_mut().map(|input| input as &mut dyn InputSource),
            Some(&physics as &dyn PhysicsQuery),
            &mut events,
            &mut *scheduler,
            &mut *session,
        );
        match ctx {
            Ok(mut ctx) => {
                controller.on_action(fired_action.handle, fired_action.action, &mut ctx)
            }
            Err(err) => {
                error!("[ACTIONS] cannot apply {:?}: {}", fired_action.action, err);
                continue;
            }
        }

        for event in events.drain(..) {
            presentation.write(PresentationMessage {
                body: entity,
                event,
            });
        }
    }
}

/// Run one controller step per player and hand the resulting velocity to avian.
pub(crate) fn fixed_tick_controllers(
    spatial_query: SpatialQuery,
    mut scheduler: ResMut<ActionScheduler>,
    mut session: ResMut<LevelSession>,
    mut input: Option<ResMut<MovementInput>>,
    mut presentation: MessageWriter<PresentationMessage>,
    mut players: Query<
        (
            Entity,
            &mut CharacterController,
            &Transform,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let physics = SpatialPhysics::new(&spatial_query);
    let mut events: Vec<PresentationEvent> = Vec::new();

    for (entity, mut controller, transform, mut velocity) in &mut players {
        controller.sync_from_host(transform.translation.truncate(), velocity.0);

        let ctx = ControllerContext::new(
            input.as_deref_mut().map(|input| input as &mut dyn InputSource),
            Some(&physics as &dyn PhysicsQuery),
            &mut events,
            &mut *scheduler,
            &mut *session,
        );
        let mut ctx = match ctx {
            Ok(ctx) => ctx,
            Err(err) => {
                warn_once!("[CONTROLLER] skipping fixed step: {}", err);
                continue;
            }
        };
        controller.fixed_tick(&mut ctx);

        velocity.0 = controller.velocity();

        for event in events.drain(..) {
            presentation.write(PresentationMessage {
                body: entity,
                event,
            });
        }
    }
}

/// Drop a jump press no controller consumed this step, so a press made while
/// no player exists never fires on a later body.
pub(crate) fn discard_unread_jump(input: Option<ResMut<MovementInput>>) {
    if let Some(mut input) = input {
        input.take_jump();
    }
}

/// Frame-rate sync of grounded, wall and speed state to presentation.
pub(crate) fn publish_presentation(
    mut controllers: Query<(Entity, &mut CharacterController)>,
    mut presentation: MessageWriter<PresentationMessage>,
) {
    let mut events: Vec<PresentationEvent> = Vec::new();
    for (entity, mut controller) in &mut controllers {
        controller.tick(&mut events);
        for event in events.drain(..) {
            presentation.write(PresentationMessage {
                body: entity,
                event,
            });
        }
    }
}

pub(crate) fn apply_presentation(
    mut commands: Commands,
    mut messages: MessageReader<PresentationMessage>,
    mut sprites: Query<&mut Sprite, With<Player>>,
) {
    for message in messages.read() {
        match message.event {
            PresentationEvent::Flip(facing) => {
                if let Ok(mut sprite) = sprites.get_mut(message.body) {
                    sprite.flip_x = facing == Facing::Left;
                }
            }
            PresentationEvent::KnockbackChanged(knocked) => {
                if let Ok(mut sprite) = sprites.get_mut(message.body) {
                    sprite.color = if knocked { KNOCKED_COLOR } else { PLAYER_COLOR };
                }
            }
            PresentationEvent::DeathVfxSpawned { position } => {
                commands.spawn((
                    VfxLifetime(DEATH_PUFF_SECS),
                    Sprite {
                        color: Color::srgb(0.95, 0.95, 0.95),
                        custom_size: Some(Vec2::splat(32.0)),
                        ..default()
                    },
                    Transform::from_translation(position.extend(2.0)),
                ));
            }
            other => trace!("[PRESENTATION] {:?}: {:?}", message.body, other),
        }
    }
}

pub(crate) fn tick_vfx_lifetimes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut VfxLifetime, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut lifetime, mut transform) in &mut query {
        lifetime.0 -= dt;
        if lifetime.0 <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            transform.scale = Vec3::splat(1.0 + (DEATH_PUFF_SECS - lifetime.0));
        }
    }
}
