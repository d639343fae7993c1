use bevy::prelude::*;

use crate::movement::MovementInput;

/// Source of player intent for the controller.
pub trait InputSource {
    /// Movement direction, each axis in `[-1, 1]`.
    fn move_axis(&self) -> Vec2;

    /// Read and clear the jump press.
    fn take_jump(&mut self) -> bool;
}

impl InputSource for MovementInput {
    fn move_axis(&self) -> Vec2 {
        self.axis.clamp(Vec2::NEG_ONE, Vec2::ONE)
    }

    fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }
}
