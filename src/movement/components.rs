//! Movement domain: body state, contact flags, jump budget and control locks.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::{ActionHandle, ActionOwner, ActionScheduler, TimedAction};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Floors and platforms
    Ground,
    /// Tall surfaces the player can slide on and jump off
    Wall,
    /// Player character
    Player,
    /// Trigger volumes (death zones, diamonds, doors...) - never block movement
    Sensor,
}

#[derive(Component, Debug)]
pub struct Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// +1 for right, -1 for left.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// Kinematic state of the controlled character.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
}

impl Body {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..default()
        }
    }
}

/// Result of this tick's ground and wall probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactState {
    pub grounded: bool,
    pub wall_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JumpBudget {
    pub extra_jumps_max: u32,
    pub extra_jumps_remaining: u32,
    /// Only a ground jump arms the double jump.
    pub double_jump_armed: bool,
}

impl JumpBudget {
    pub fn new(extra_jumps_max: u32) -> Self {
        Self {
            extra_jumps_max,
            extra_jumps_remaining: extra_jumps_max,
            double_jump_armed: false,
        }
    }

    /// Ground contact restores every extra jump and disarms the double jump.
    pub fn refill(&mut self) {
        self.extra_jumps_remaining = self.extra_jumps_max;
        self.double_jump_armed = false;
    }

    pub fn arm(&mut self) {
        self.double_jump_armed = true;
    }

    pub fn disarm(&mut self) {
        self.double_jump_armed = false;
    }

    pub fn can_double_jump(&self) -> bool {
        self.double_jump_armed && self.extra_jumps_remaining > 0
    }

    pub fn consume(&mut self) {
        self.extra_jumps_remaining = self.extra_jumps_remaining.saturating_sub(1);
        self.double_jump_armed = false;
    }
}

/// A flag that may be backed by a pending scheduler action.
///
/// Re-engaging cancels the previous action, so there is never more than one
/// timer per flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimedFlag {
    active: bool,
    handle: Option<ActionHandle>,
}

impl TimedFlag {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn handle(&self) -> Option<ActionHandle> {
        self.handle
    }

    /// Raise the flag and (re)start its expiry timer.
    pub fn restart(
        &mut self,
        scheduler: &mut ActionScheduler,
        owner: ActionOwner,
        delay_secs: f32,
        action: TimedAction,
    ) {
        self.cancel_timer(scheduler);
        self.handle = Some(scheduler.schedule_secs(owner, delay_secs, action));
        self.active = true;
    }

    /// Raise the flag with no expiry.
    pub fn hold(&mut self, scheduler: &mut ActionScheduler) {
        self.cancel_timer(scheduler);
        self.active = true;
    }

    /// Lower the flag if `handle` is the timer currently backing it.
    ///
    /// Returns false for superseded timers.
    pub fn expire(&mut self, handle: ActionHandle) -> bool {
        if self.handle != Some(handle) {
            return false;
        }
        self.handle = None;
        self.active = false;
        true
    }

    fn cancel_timer(&mut self, scheduler: &mut ActionScheduler) {
        if let Some(old) = self.handle.take() {
            scheduler.cancel(old);
        }
    }
}

/// Timed overrides of voluntary control, checked in priority order
/// `movement` > `knocked_back` > `wall_jump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlLock {
    /// Pre-spawn delay or door transition.
    pub movement: TimedFlag,
    /// Knockback in progress; all voluntary control suppressed.
    pub knocked_back: TimedFlag,
    /// Horizontal input ignored right after a wall jump.
    pub wall_jump: TimedFlag,
}

/// Short-lived visual effect, despawned when the timer runs out.
#[derive(Component, Debug)]
pub struct VfxLifetime(pub f32);
