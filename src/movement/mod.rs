//! Movement domain: the player character controller and its ECS wiring.

mod bootstrap;
mod components;
mod contact;
mod controller;
mod error;
mod input;
mod resources;
pub(crate) mod systems;


use bevy::prelude::*;

use crate::core::GameState;

pub use bootstrap::{PLAYER_COLOR, PLAYER_SIZE};
pub use components::{
    Body, ContactState, ControlLock, Facing, GameLayer, JumpBudget, Player, TimedFlag,
    VfxLifetime,
};
pub use contact::{ContactClassifier, PhysicsQuery, RayHit};
pub use controller::{CharacterController, ControllerContext, knockback_direction};
pub use error::ControllerError;
pub use input::InputSource;
pub use resources::{Impulse, MovementInput, MovementTuning};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_systems(
                FixedUpdate,
                (
                    systems::run_scheduled_actions,
                    systems::fixed_tick_controllers,
                    systems::discard_unread_jump,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    systems::read_input,
                    bootstrap::spawn_requested_players,
                    systems::publish_presentation,
                    systems::apply_presentation,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, systems::tick_vfx_lifetimes);
    }
}
