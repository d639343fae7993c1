//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::ControllerError;

/// A 2D velocity as written in tuning data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impulse {
    pub x: f32,
    pub y: f32,
}

impl Impulse {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Controller tuning, loaded from `assets/data/tuning.ron`.
///
/// Distances are in world pixels, times in seconds.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub speed: f32,
    pub jump_force: f32,
    pub extra_jumps: u32,
    /// Length of each foot ray, measured from the foot anchor.
    pub ray_length: f32,
    /// Horizontal offset of each foot anchor from the body center.
    pub foot_spacing: f32,
    /// Vertical offset of the foot anchors below the body center.
    pub foot_height: f32,
    /// Length of the facing-direction wall ray, measured from the body center.
    pub wall_check_distance: f32,
    pub wall_slide_factor: f32,
    /// Slide factor while holding down against a wall.
    pub fast_descend_factor: f32,
    pub wall_jump_force: Impulse,
    pub wall_jump_duration: f32,
    pub knock_power: Impulse,
    pub knocked_duration: f32,
    pub spawn_lock_delay: f32,
    pub door_move_delay: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            speed: 320.0,
            jump_force: 680.0,
            extra_jumps: 1,
            ray_length: 4.0,
            foot_spacing: 10.0,
            foot_height: 24.0,
            wall_check_distance: 16.0,
            wall_slide_factor: 0.5,
            fast_descend_factor: 1.0,
            wall_jump_force: Impulse::new(400.0, 600.0),
            wall_jump_duration: 0.15,
            knock_power: Impulse::new(300.0, 350.0),
            knocked_duration: 0.5,
            spawn_lock_delay: 1.0,
            door_move_delay: 1.0,
        }
    }
}

impl MovementTuning {
    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ControllerError> {
        non_negative("speed", self.speed)?;
        non_negative("jump_force", self.jump_force)?;
        positive("ray_length", self.ray_length)?;
        non_negative("foot_spacing", self.foot_spacing)?;
        non_negative("foot_height", self.foot_height)?;
        positive("wall_check_distance", self.wall_check_distance)?;
        non_negative("wall_slide_factor", self.wall_slide_factor)?;
        non_negative("fast_descend_factor", self.fast_descend_factor)?;
        finite("wall_jump_force.x", self.wall_jump_force.x)?;
        finite("wall_jump_force.y", self.wall_jump_force.y)?;
        finite("knock_power.x", self.knock_power.x)?;
        finite("knock_power.y", self.knock_power.y)?;
        non_negative("wall_jump_duration", self.wall_jump_duration)?;
        non_negative("knocked_duration", self.knocked_duration)?;
        non_negative("spawn_lock_delay", self.spawn_lock_delay)?;
        non_negative("door_move_delay", self.door_move_delay)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ControllerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ControllerError::invalid(field, format!("{value} is not finite")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ControllerError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ControllerError::invalid(field, format!("{value} is negative")));
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ControllerError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ControllerError::invalid(field, format!("{value} must be > 0")));
    }
    Ok(())
}

/// Latest sampled player intent.
///
/// `jump_pressed` latches until the fixed step consumes it, since several
/// frames can pass between two fixed ticks.
#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub axis: Vec2,
    pub jump_pressed: bool,
}
