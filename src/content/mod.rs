//! Content domain: tuning and level data read from assets/data at startup.

mod data;
mod loader;
mod registry;
mod validation;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use std::path::Path;

pub use data::{LevelDef, SolidKind, ZoneKind};
pub use registry::LevelRegistry;

use loader::load_all_content;
use validation::validate_levels;

use crate::core::GameState;
use crate::session::LevelSession;

const DATA_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelRegistry>()
            .add_systems(Startup, load_content);
    }
}

fn load_content(mut commands: Commands, mut next_state: ResMut<NextState<GameState>>) {
    let (content, errors) = load_all_content(Path::new(DATA_DIR));

    for error in &errors {
        warn!("[CONTENT] {} (falling back to defaults)", error);
    }
    for error in validate_levels(&content.levels) {
        warn!("[CONTENT] {}", error);
    }
    info!("[CONTENT] {}", content.levels.summary());

    commands.insert_resource(content.tuning.movement);
    commands.insert_resource(LevelSession::new(content.tuning.session));
    commands.insert_resource(content.levels);
    next_state.set(GameState::Playing);
}
