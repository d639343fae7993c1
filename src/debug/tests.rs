//! Debug domain: hotkey binding tests.

use bevy::prelude::*;

use super::systems::{CHECKPOINT_KEY, KILL_KEY, KNOCKBACK_KEY, WARP_KEY};
use crate::movement::systems::input::{DOWN_KEYS, JUMP_KEYS, LEFT_KEYS, RIGHT_KEYS, UP_KEYS};

#[test]
fn test_debug_hotkeys_do_not_overlap_gameplay_keys() {
    let gameplay: Vec<KeyCode> = [LEFT_KEYS, RIGHT_KEYS, DOWN_KEYS, UP_KEYS, JUMP_KEYS].concat();
    for key in [KILL_KEY, KNOCKBACK_KEY, CHECKPOINT_KEY, WARP_KEY] {
        assert!(!gameplay.contains(&key), "{:?} is also a gameplay key", key);
    }
}
