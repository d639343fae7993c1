//! Debug tools for tuning the controller.
//!
//! Features:
//! - Foot and wall probe gizmos (F1)
//! - Info overlay with contacts, locks and session counters (F2)
//! - Kill, knock back, set checkpoint and warp hotkeys (Ctrl+X/H/C/N)

mod state;
mod systems;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::core::GameState;

pub use state::DebugState;
use systems::{
    draw_contact_rays, handle_debug_hotkeys, toggle_debug_overlays, update_debug_info_overlay,
    update_status_message,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (
                    toggle_debug_overlays,
                    handle_debug_hotkeys.run_if(in_state(GameState::Playing)),
                    update_status_message,
                    update_debug_info_overlay,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                draw_contact_rays.run_if(|state: Res<DebugState>| state.show_rays),
            );
    }
}
