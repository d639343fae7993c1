//! Movement domain: the character controller state machine.
//!
//! The controller owns the body's kinematic state and decides, once per fixed
//! step, how input, contacts and active locks turn into velocity. Everything
//! it talks to is passed in per call, so it runs the same inside the ECS and
//! in plain unit tests.

use bevy::prelude::*;

use crate::core::{
    ActionHandle, ActionOwner, ActionScheduler, BodyId, PresentationEvent, PresentationSink,
    TimedAction,
};
use crate::movement::{
    Body, ContactClassifier, ContactState, ControlLock, ControllerError, Facing, InputSource,
    JumpBudget, MovementTuning, PhysicsQuery,
};
use crate::session::SessionCoordinator;

/// Speed changes smaller than this are not re-published.
const SPEED_EPSILON: f32 = 0.01;

/// Collaborators for a single fixed step or scheduled action.
pub struct ControllerContext<'a> {
    pub input: &'a mut dyn InputSource,
    pub physics: &'a dyn PhysicsQuery,
    pub events: &'a mut dyn PresentationSink,
    pub scheduler: &'a mut ActionScheduler,
    pub session: &'a mut dyn SessionCoordinator,
}

impl<'a> ControllerContext<'a> {
    /// Bundle collaborators, failing if input or physics is absent.
    pub fn new(
        input: Option<&'a mut dyn InputSource>,
        physics: Option<&'a dyn PhysicsQuery>,
        events: &'a mut dyn PresentationSink,
        scheduler: &'a mut ActionScheduler,
        session: &'a mut dyn SessionCoordinator,
    ) -> Result<Self, ControllerError> {
        let input = input.ok_or(ControllerError::MissingCollaborator("input source"))?;
        let physics = physics.ok_or(ControllerError::MissingCollaborator("physics query"))?;
        Ok(Self {
            input,
            physics,
            events,
            scheduler,
            session,
        })
    }
}

/// Values last handed to presentation, for change detection in [`CharacterController::tick`].
#[derive(Debug, Clone, Copy, Default)]
struct Published {
    grounded: Option<bool>,
    wall_detected: Option<bool>,
    speed: Option<f32>,
}

#[derive(Component, Debug, Clone)]
pub struct CharacterController {
    id: BodyId,
    tuning: MovementTuning,
    classifier: ContactClassifier,
    body: Body,
    contact: ContactState,
    jumps: JumpBudget,
    locks: ControlLock,
    knock_power: Vec2,
    door_entered: bool,
    destroyed: bool,
    /// Velocity was set by an entry point; the next host sync must not overwrite it.
    velocity_override: bool,
    published: Published,
}

impl CharacterController {
    /// Create a controller for a freshly spawned body.
    ///
    /// A body spawned at a checkpoint is controllable immediately; otherwise
    /// movement stays locked for `spawn_lock_delay`.
    pub fn spawn(
        id: BodyId,
        tuning: MovementTuning,
        position: Vec2,
        from_checkpoint: bool,
        scheduler: &mut ActionScheduler,
        events: &mut dyn PresentationSink,
    ) -> Result<Self, ControllerError> {
        tuning.validate()?;

        let mut controller = Self {
            id,
            classifier: ContactClassifier::from_tuning(&tuning),
            body: Body::at(position),
            contact: ContactState::default(),
            jumps: JumpBudget::new(tuning.extra_jumps),
            locks: ControlLock::default(),
            knock_power: tuning.knock_power.to_vec2(),
            door_entered: false,
            destroyed: false,
            velocity_override: false,
            published: Published::default(),
            tuning,
        };

        if from_checkpoint {
            events.emit(PresentationEvent::Idle);
        } else {
            let delay = controller.tuning.spawn_lock_delay;
            controller.locks.movement.restart(
                scheduler,
                controller.owner(),
                delay,
                TimedAction::ReleaseMovementLock,
            );
        }

        debug!(
            "[CONTROLLER] spawned {:?} at {:?} (checkpoint={})",
            id, position, from_checkpoint
        );
        Ok(controller)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn owner(&self) -> ActionOwner {
        ActionOwner::Body(self.id)
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    pub fn classifier(&self) -> &ContactClassifier {
        &self.classifier
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn facing(&self) -> Facing {
        self.body.facing
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn contact(&self) -> ContactState {
        self.contact
    }

    pub fn jumps(&self) -> &JumpBudget {
        &self.jumps
    }

    pub fn locks(&self) -> &ControlLock {
        &self.locks
    }

    pub fn knock_power(&self) -> Vec2 {
        self.knock_power
    }

    pub fn is_movement_locked(&self) -> bool {
        self.locks.movement.is_active()
    }

    pub fn is_knocked_back(&self) -> bool {
        self.locks.knocked_back.is_active()
    }

    pub fn is_wall_jumping(&self) -> bool {
        self.locks.wall_jump.is_active()
    }

    pub fn door_entered(&self) -> bool {
        self.door_entered
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Copy the physics engine's view of the body in before a fixed step.
    ///
    /// A velocity set by `knockback` or `door_in` since the last sync wins over
    /// the host's, so it reaches the physics body on this step.
    pub fn sync_from_host(&mut self, position: Vec2, velocity: Vec2) {
        self.body.position = position;
        if !std::mem::take(&mut self.velocity_override) {
            self.body.velocity = velocity;
        }
    }

    /// Update the position only, for entry points called between fixed steps.
    pub fn sync_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    // ------------------------------------------------------------------
    // Fixed step
    // ------------------------------------------------------------------

    /// One simulation step.
    pub fn fixed_tick(&mut self, ctx: &mut ControllerContext<'_>) {
        // Jump is edge-triggered: a press is spent on this tick whatever happens.
        let jump_pressed = ctx.input.take_jump();

        if self.destroyed || self.is_movement_locked() || self.is_knocked_back() {
            return;
        }

        let axis = ctx.input.move_axis();

        self.contact = self.classifier.classify(&self.body, ctx.physics);
        if self.contact.grounded {
            self.jumps.refill();
        }

        self.wall_slide(axis);
        self.horizontal_move(axis, ctx.events);

        if jump_pressed {
            self.jump(ctx);
        }
    }

    fn wall_slide(&mut self, axis: Vec2) {
        if !self.contact.wall_detected || self.body.velocity.y >= 0.0 {
            return;
        }
        let factor = if axis.y < 0.0 {
            self.tuning.fast_descend_factor
        } else {
            self.tuning.wall_slide_factor
        };
        self.body.velocity.y *= factor;
        self.jumps.disarm();
    }

    fn horizontal_move(&mut self, axis: Vec2, events: &mut dyn PresentationSink) {
        let clinging = self.contact.wall_detected && !self.contact.grounded;
        if clinging || self.is_wall_jumping() {
            return;
        }
        self.face_toward(axis.x, events);
        self.body.velocity.x = axis.x * self.tuning.speed;
    }

    fn jump(&mut self, ctx: &mut ControllerContext<'_>) {
        if self.contact.grounded {
            self.body.velocity.y = self.tuning.jump_force;
            self.jumps.arm();
            debug!("[CONTROLLER] ground jump");
        } else if self.contact.wall_detected {
            self.wall_jump(ctx.scheduler, ctx.events);
        } else if self.jumps.can_double_jump() {
            self.jumps.consume();
            self.body.velocity.y = self.tuning.jump_force;
            debug!(
                "[CONTROLLER] double jump, {} extra left",
                self.jumps.extra_jumps_remaining
            );
        }
    }

    fn wall_jump(&mut self, scheduler: &mut ActionScheduler, events: &mut dyn PresentationSink) {
        let away = -self.body.facing.sign();
        self.body.velocity = Vec2::new(
            self.tuning.wall_jump_force.x * away,
            self.tuning.wall_jump_force.y,
        );
        self.flip(events);

        let owner = self.owner();
        let duration = self.tuning.wall_jump_duration;
        self.locks.wall_jump.restart(
            scheduler,
            owner,
            duration,
            TimedAction::EndWallJumpLockout,
        );
        debug!("[CONTROLLER] wall jump, now facing {:?}", self.body.facing);
    }

    fn face_toward(&mut self, direction_x: f32, events: &mut dyn PresentationSink) {
        if direction_x * self.body.facing.sign() < 0.0 {
            self.flip(events);
        }
    }

    fn flip(&mut self, events: &mut dyn PresentationSink) {
        self.body.facing = self.body.facing.flipped();
        events.emit(PresentationEvent::Flip(self.body.facing));
    }

    // ------------------------------------------------------------------
    // Scheduled actions
    // ------------------------------------------------------------------

    /// Apply a scheduled action that fired for this body.
    ///
    /// Stale handles (superseded by a restart) are ignored.
    pub fn on_action(
        &mut self,
        handle: ActionHandle,
        action: TimedAction,
        ctx: &mut ControllerContext<'_>,
    ) {
        if self.destroyed {
            return;
        }

        match action {
            TimedAction::EndWallJumpLockout => {
                if self.locks.wall_jump.expire(handle) {
                    let axis = ctx.input.move_axis();
                    self.face_toward(axis.x, ctx.events);
                }
            }
            TimedAction::RecoverFromKnockback => {
                if self.locks.knocked_back.expire(handle) {
                    self.knock_power = self.tuning.knock_power.to_vec2();
                    ctx.events.emit(PresentationEvent::KnockbackChanged(false));
                }
            }
            TimedAction::ReleaseMovementLock => {
                if self.door_entered {
                    return;
                }
                if self.locks.movement.expire(handle) {
                    debug!("[CONTROLLER] movement unlocked for {:?}", self.id);
                }
            }
            TimedAction::EnterDestination { scene } => {
                info!("[CONTROLLER] entering scene {}", scene);
                ctx.session.request_scene_transition(scene);
            }
            TimedAction::RespawnPlayer => {
                warn!("[CONTROLLER] respawn action routed to a body, ignoring");
            }
        }
    }

    // ------------------------------------------------------------------
    // Frame-rate presentation sync
    // ------------------------------------------------------------------

    /// Publish grounded, wall and speed state when they changed.
    pub fn tick(&mut self, events: &mut dyn PresentationSink) {
        if self.destroyed {
            return;
        }

        if self.published.grounded != Some(self.contact.grounded) {
            self.published.grounded = Some(self.contact.grounded);
            events.emit(PresentationEvent::GroundedChanged(self.contact.grounded));
        }

        if self.published.wall_detected != Some(self.contact.wall_detected) {
            self.published.wall_detected = Some(self.contact.wall_detected);
            events.emit(PresentationEvent::WallDetectedChanged(
                self.contact.wall_detected,
            ));
        }

        let speed = self.body.velocity.x.abs();
        let changed = match self.published.speed {
            Some(last) => (last - speed).abs() > SPEED_EPSILON,
            None => true,
        };
        if changed {
            self.published.speed = Some(speed);
            events.emit(PresentationEvent::SpeedChanged(speed));
        }
    }

    // ------------------------------------------------------------------
    // External entry points
    // ------------------------------------------------------------------

    /// Knock the body away from `source_x` with the current knock power.
    pub fn knockback(
        &mut self,
        source_x: f32,
        scheduler: &mut ActionScheduler,
        events: &mut dyn PresentationSink,
    ) -> bool {
        self.knockback_with_power(source_x, None, scheduler, events)
    }

    /// Knockback with an optional power override, kept until recovery.
    ///
    /// Returns false if the body could not be knocked (locked or destroyed).
    pub fn knockback_with_power(
        &mut self,
        source_x: f32,
        power: Option<Vec2>,
        scheduler: &mut ActionScheduler,
        events: &mut dyn PresentationSink,
    ) -> bool {
        if self.destroyed || self.is_movement_locked() {
            debug!("[CONTROLLER] knockback ignored for {:?}", self.id);
            return false;
        }

        if let Some(power) = power {
            self.knock_power = power;
        }

        let direction = knockback_direction(self.body.position.x, source_x);
        self.body.velocity = Vec2::new(self.knock_power.x * direction, self.knock_power.y);
        self.velocity_override = true;

        let owner = self.owner();
        let duration = self.tuning.knocked_duration;
        self.locks.knocked_back.restart(
            scheduler,
            owner,
            duration,
            TimedAction::RecoverFromKnockback,
        );
        events.emit(PresentationEvent::KnockbackChanged(true));
        true
    }

    /// Walk through a door: freeze, then ask for `destination` after `door_move_delay`.
    ///
    /// Only the first call has any effect.
    pub fn door_in(
        &mut self,
        destination: usize,
        scheduler: &mut ActionScheduler,
        events: &mut dyn PresentationSink,
    ) -> bool {
        if self.destroyed || self.door_entered {
            return false;
        }

        self.door_entered = true;
        self.body.velocity = Vec2::ZERO;
        self.velocity_override = true;
        self.locks.movement.hold(scheduler);

        events.emit(PresentationEvent::Idle);
        events.emit(PresentationEvent::DoorIn);

        scheduler.schedule_secs(
            self.owner(),
            self.tuning.door_move_delay,
            TimedAction::EnterDestination { scene: destination },
        );
        info!("[CONTROLLER] door entered, destination scene {}", destination);
        true
    }

    /// Destroy the body and hand control to the session for a respawn.
    pub fn die(
        &mut self,
        scheduler: &mut ActionScheduler,
        events: &mut dyn PresentationSink,
        session: &mut dyn SessionCoordinator,
    ) {
        if self.destroyed {
            return;
        }

        events.emit(PresentationEvent::DeathVfxSpawned {
            position: self.body.position,
        });
        let dropped = scheduler.cancel_owner(self.owner());
        self.destroyed = true;
        info!(
            "[CONTROLLER] {:?} died at {:?} ({} pending actions dropped)",
            self.id, self.body.position, dropped
        );

        session.on_player_died(scheduler);
    }
}

/// +1 to push right, -1 to push left. A source directly on the body pushes right.
pub fn knockback_direction(body_x: f32, source_x: f32) -> f32 {
    if body_x >= source_x { 1.0 } else { -1.0 }
}
