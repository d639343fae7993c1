//! Movement domain: keyboard sampling.

use bevy::prelude::*;

use crate::movement::MovementInput;

pub(crate) const LEFT_KEYS: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
pub(crate) const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
pub(crate) const DOWN_KEYS: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
pub(crate) const UP_KEYS: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
pub(crate) const JUMP_KEYS: [KeyCode; 2] = [KeyCode::Space, KeyCode::KeyK];

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<MovementInput>) {
    let mut x = 0.0;
    if keyboard.any_pressed(LEFT_KEYS) {
        x -= 1.0;
    }
    if keyboard.any_pressed(RIGHT_KEYS) {
        x += 1.0;
    }

    // Down against a wall selects fast descend
    let mut y = 0.0;
    if keyboard.any_pressed(DOWN_KEYS) {
        y -= 1.0;
    }
    if keyboard.any_pressed(UP_KEYS) {
        y += 1.0;
    }

    input.axis = Vec2::new(x, y);

    // Latched until the fixed step takes it
    if keyboard.any_just_pressed(JUMP_KEYS) {
        input.jump_pressed = true;
    }
}
