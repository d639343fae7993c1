//! Core domain: game state, the action scheduler, and shared messages.

pub mod events;
pub mod scheduler;
mod state;

pub use events::{PresentationEvent, PresentationMessage, PresentationSink, SpawnPlayerRequest};
pub use scheduler::{ActionHandle, ActionOwner, ActionScheduler, BodyId, FiredAction, TimedAction};
pub use state::GameState;

use bevy::prelude::*;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<ActionScheduler>()
            .add_message::<PresentationMessage>()
            .add_message::<SpawnPlayerRequest>()
            .add_systems(Startup, setup_camera);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
