//! Core domain: presentation events and cross-domain messages.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::movement::Facing;

/// Fire-and-forget notifications for whatever renders or animates the player.
///
/// Nothing in the simulation reads these back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationEvent {
    GroundedChanged(bool),
    WallDetectedChanged(bool),
    /// Absolute horizontal speed.
    SpeedChanged(f32),
    KnockbackChanged(bool),
    Flip(Facing),
    Idle,
    DoorIn,
    DeathVfxSpawned { position: Vec2 },
}

/// Receiver for [`PresentationEvent`]s emitted by a controller.
pub trait PresentationSink {
    fn emit(&mut self, event: PresentationEvent);
}

impl PresentationSink for Vec<PresentationEvent> {
    fn emit(&mut self, event: PresentationEvent) {
        self.push(event);
    }
}

/// Presentation event tagged with the body that produced it.
#[derive(Debug, Clone, Copy)]
pub struct PresentationMessage {
    pub body: Entity,
    pub event: PresentationEvent,
}

impl Message for PresentationMessage {}

/// Emitted when the session wants a player body in the world.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlayerRequest {
    pub position: Vec2,
    pub from_checkpoint: bool,
}

impl Message for SpawnPlayerRequest {}
