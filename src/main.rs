mod content;
mod core;
#[cfg(feature = "dev-tools")]
mod debug;
mod level;
mod movement;
mod session;
mod triggers;

use avian2d::prelude::*;
use bevy::prelude::*;

/// World gravity in pixels per second squared.
const GRAVITY: f32 = 1800.0;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Diamond Dash".to_string(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Gravity(Vec2::NEG_Y * GRAVITY))
    .add_plugins((
        core::CorePlugin,
        content::ContentPlugin,
        movement::MovementPlugin,
        session::SessionPlugin,
        triggers::TriggersPlugin,
        level::LevelPlugin,
    ));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(debug::DebugPlugin);

    app.run();
}
