//! Core domain: single-shot deferred actions on the simulation clock.
//!
//! Every lockout, recovery, spawn delay and door delay in the game is a
//! [`TimedAction`] registered here against an [`ActionOwner`]. The clock only
//! moves when [`ActionScheduler::advance`] is called from the fixed step, so
//! timing is deterministic and independent of frame rate.

use std::time::Duration;

use bevy::prelude::*;

/// Stable identity of a controlled body, used to route scheduled actions.
///
/// The host derives it from the owning entity (`Entity::to_bits`), tests can
/// pick any number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u64);

impl From<Entity> for BodyId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

/// Who a scheduled action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionOwner {
    Body(BodyId),
    Session,
}

/// The deferred actions the game knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedAction {
    /// Give horizontal control back after a wall jump.
    EndWallJumpLockout,
    /// Leave the knocked-back state and restore the default knock power.
    RecoverFromKnockback,
    /// Lift the pre-spawn movement lock.
    ReleaseMovementLock,
    /// Ask the session to load the level behind a door.
    EnterDestination { scene: usize },
    /// Spawn a fresh player after death.
    RespawnPlayer,
}

/// Cancellation token returned by [`ActionScheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionHandle(u64);

/// An action whose due time has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredAction {
    pub handle: ActionHandle,
    pub owner: ActionOwner,
    pub action: TimedAction,
}

#[derive(Debug, Clone)]
struct PendingAction {
    handle: ActionHandle,
    owner: ActionOwner,
    action: TimedAction,
    due: Duration,
}

#[derive(Resource, Debug, Default)]
pub struct ActionScheduler {
    now: Duration,
    next_handle: u64,
    pending: Vec<PendingAction>,
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Register `action` to fire once `delay` of simulation time has passed.
    pub fn schedule(
        &mut self,
        owner: ActionOwner,
        delay: Duration,
        action: TimedAction,
    ) -> ActionHandle {
        let handle = ActionHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(PendingAction {
            handle,
            owner,
            action,
            due: self.now + delay,
        });
        handle
    }

    /// Same as [`schedule`](Self::schedule) with a delay in seconds, as stored in tuning data.
    ///
    /// Negative or non-finite delays are treated as zero.
    pub fn schedule_secs(
        &mut self,
        owner: ActionOwner,
        delay_secs: f32,
        action: TimedAction,
    ) -> ActionHandle {
        let delay = if delay_secs.is_finite() && delay_secs > 0.0 {
            Duration::from_secs_f32(delay_secs)
        } else {
            Duration::ZERO
        };
        self.schedule(owner, delay, action)
    }

    /// Cancel a single pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: ActionHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Cancel everything registered by `owner`, returning how many actions were dropped.
    pub fn cancel_owner(&mut self, owner: ActionOwner) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.owner != owner);
        before - self.pending.len()
    }

    pub fn is_pending(&self, handle: ActionHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn pending_for(&self, owner: ActionOwner) -> usize {
        self.pending.iter().filter(|p| p.owner == owner).count()
    }

    /// Time left before `handle` fires, if it is still pending.
    pub fn remaining(&self, handle: ActionHandle) -> Option<Duration> {
        self.pending
            .iter()
            .find(|p| p.handle == handle)
            .map(|p| p.due.saturating_sub(self.now))
    }

    /// Move the clock forward and return every action that became due, oldest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<FiredAction> {
        self.now += dt;
        let now = self.now;

        let (mut due, pending): (Vec<PendingAction>, Vec<PendingAction>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| p.due <= now);
        self.pending = pending;

        due.sort_by_key(|p| (p.due, p.handle));
        due.into_iter()
            .map(|p| FiredAction {
                handle: p.handle,
                owner: p.owner,
                action: p.action,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: ActionOwner = ActionOwner::Body(BodyId(7));

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_action_fires_once_when_due() {
        let mut scheduler = ActionScheduler::new();
        scheduler.schedule(PLAYER, ms(100), TimedAction::EndWallJumpLockout);

        assert!(scheduler.advance(ms(60)).is_empty());
        let fired = scheduler.advance(ms(40));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].owner, PLAYER);
        assert_eq!(fired[0].action, TimedAction::EndWallJumpLockout);

        assert!(scheduler.advance(ms(500)).is_empty());
    }

    #[test]
    fn test_cancelled_action_never_fires() {
        let mut scheduler = ActionScheduler::new();
        let handle = scheduler.schedule(PLAYER, ms(50), TimedAction::RecoverFromKnockback);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.advance(ms(100)).is_empty());
    }

    #[test]
    fn test_cancel_owner_only_drops_that_owner() {
        let mut scheduler = ActionScheduler::new();
        scheduler.schedule(PLAYER, ms(10), TimedAction::EndWallJumpLockout);
        scheduler.schedule(PLAYER, ms(20), TimedAction::RecoverFromKnockback);
        scheduler.schedule(ActionOwner::Session, ms(30), TimedAction::RespawnPlayer);

        assert_eq!(scheduler.cancel_owner(PLAYER), 2);
        assert_eq!(scheduler.pending_for(PLAYER), 0);

        let fired = scheduler.advance(ms(30));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, TimedAction::RespawnPlayer);
    }

    #[test]
    fn test_fired_actions_come_out_in_due_order() {
        let mut scheduler = ActionScheduler::new();
        scheduler.schedule(PLAYER, ms(30), TimedAction::ReleaseMovementLock);
        scheduler.schedule(PLAYER, ms(10), TimedAction::EndWallJumpLockout);
        scheduler.schedule(PLAYER, ms(10), TimedAction::RecoverFromKnockback);

        let actions: Vec<TimedAction> = scheduler
            .advance(ms(40))
            .into_iter()
            .map(|f| f.action)
            .collect();
        assert_eq!(
            actions,
            vec![
                TimedAction::EndWallJumpLockout,
                TimedAction::RecoverFromKnockback,
                TimedAction::ReleaseMovementLock,
            ]
        );
    }

    #[test]
    fn test_remaining_tracks_the_clock() {
        let mut scheduler = ActionScheduler::new();
        let handle = scheduler.schedule(PLAYER, ms(100), TimedAction::ReleaseMovementLock);

        scheduler.advance(ms(30));
        assert_eq!(scheduler.remaining(handle), Some(ms(70)));
        assert_eq!(scheduler.now(), ms(30));

        scheduler.advance(ms(70));
        assert_eq!(scheduler.remaining(handle), None);
        assert!(!scheduler.is_pending(handle));
    }

    #[test]
    fn test_bad_delays_fire_on_next_advance() {
        let mut scheduler = ActionScheduler::new();
        scheduler.schedule_secs(PLAYER, -1.0, TimedAction::EndWallJumpLockout);
        scheduler.schedule_secs(PLAYER, f32::NAN, TimedAction::RecoverFromKnockback);

        assert_eq!(scheduler.advance(Duration::ZERO).len(), 2);
    }
}
