//! Session domain: checkpoint, respawn, collectibles and level exits.
//!
//! One [`LevelSession`] lives for the whole game. Controllers reach it through
//! the [`SessionCoordinator`] trait; ECS systems flush its queued spawn and
//! scene requests into messages.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::{ActionHandle, ActionOwner, ActionScheduler, SpawnPlayerRequest, TimedAction};


/// What the controller needs from the game session.
pub trait SessionCoordinator {
    fn has_active_checkpoint(&self) -> bool;
    fn checkpoint_position(&self) -> Option<Vec2>;
    /// Called once the body is destroyed; schedules the respawn.
    fn on_player_died(&mut self, scheduler: &mut ActionScheduler);
    fn spawn_player(&mut self, at: Vec2);
    fn request_scene_transition(&mut self, scene: usize);
    fn add_collectible(&mut self);
    fn open_entrance_door(&mut self);
}

/// Session tuning, the `session` block of `assets/data/tuning.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub respawn_delay: f32,
    /// Give each diamond a random look instead of the first one.
    pub diamond_random_look: bool,
    pub diamond_looks: u32,
    /// Fixed seed for diamond looks; random when absent.
    pub seed: Option<u64>,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            respawn_delay: 1.0,
            diamond_random_look: false,
            diamond_looks: 4,
            seed: None,
        }
    }
}

#[derive(Resource, Debug)]
pub struct LevelSession {
    tuning: SessionTuning,
    level: Option<usize>,
    spawn_point: Vec2,
    checkpoint: Option<Vec2>,
    diamonds_collected: u32,
    total_diamonds: u32,
    entrance_door_open: bool,
    respawn: Option<ActionHandle>,
    spawn_requests: Vec<SpawnPlayerRequest>,
    scene_requests: Vec<usize>,
    rng: ChaCha8Rng,
}

impl Default for LevelSession {
    fn default() -> Self {
        Self::new(SessionTuning::default())
    }
}

impl LevelSession {
    pub fn new(tuning: SessionTuning) -> Self {
        let seed = tuning.seed.unwrap_or_else(rand::random::<u64>);
        Self {
            tuning,
            level: None,
            spawn_point: Vec2::ZERO,
            checkpoint: None,
            diamonds_collected: 0,
            total_diamonds: 0,
            entrance_door_open: false,
            respawn: None,
            spawn_requests: Vec::new(),
            scene_requests: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    /// Reset per-level state and queue the first player spawn.
    pub fn begin_level(
        &mut self,
        level: usize,
        spawn_point: Vec2,
        total_diamonds: u32,
        scheduler: &mut ActionScheduler,
    ) {
        scheduler.cancel_owner(ActionOwner::Session);
        self.level = Some(level);
        self.spawn_point = spawn_point;
        self.checkpoint = None;
        self.diamonds_collected = 0;
        self.total_diamonds = total_diamonds;
        self.entrance_door_open = false;
        self.respawn = None;
        self.spawn_requests.clear();
        self.scene_requests.clear();
        info!(
            "[SESSION] level {} started, {} diamonds to find",
            level, total_diamonds
        );
        self.spawn_player(spawn_point);
    }

    pub fn current_level(&self) -> Option<usize> {
        self.level
    }

    /// Make `position` the respawn point. Returns false if it already was.
    pub fn activate_checkpoint(&mut self, position: Vec2) -> bool {
        if self.checkpoint == Some(position) {
            return false;
        }
        self.checkpoint = Some(position);
        info!("[SESSION] checkpoint activated at {:?}", position);
        true
    }

    /// Where the next player appears: the checkpoint if one is active, else the level spawn.
    pub fn respawn_position(&self) -> Vec2 {
        self.checkpoint.unwrap_or(self.spawn_point)
    }

    pub fn is_respawn_pending(&self) -> bool {
        self.respawn.is_some()
    }

    pub fn diamonds_collected(&self) -> u32 {
        self.diamonds_collected
    }

    pub fn total_diamonds(&self) -> u32 {
        self.total_diamonds
    }

    pub fn is_entrance_door_open(&self) -> bool {
        self.entrance_door_open
    }

    /// Look index for the next spawned diamond.
    pub fn next_diamond_look(&mut self) -> u32 {
        if self.tuning.diamond_random_look && self.tuning.diamond_looks > 1 {
            self.rng.random_range(0..self.tuning.diamond_looks)
        } else {
            0
        }
    }

    /// Apply a scheduled action owned by the session.
    pub fn on_action(&mut self, action: TimedAction, _scheduler: &mut ActionScheduler) {
        match action {
            TimedAction::RespawnPlayer => {
                self.respawn = None;
                let at = self.respawn_position();
                info!("[SESSION] respawning player at {:?}", at);
                self.spawn_player(at);
            }
            other => warn!("[SESSION] unexpected session action {:?}", other),
        }
    }

    pub fn take_spawn_requests(&mut self) -> Vec<SpawnPlayerRequest> {
        std::mem::take(&mut self.spawn_requests)
    }

    pub fn take_scene_requests(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.scene_requests)
    }
}

impl SessionCoordinator for LevelSession {
    fn has_active_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    fn checkpoint_position(&self) -> Option<Vec2> {
        self.checkpoint
    }

    fn on_player_died(&mut self, scheduler: &mut ActionScheduler) {
        if let Some(handle) = self.respawn
            && scheduler.is_pending(handle)
        {
            debug!("[SESSION] respawn already pending");
            return;
        }
        self.respawn = Some(scheduler.schedule_secs(
            ActionOwner::Session,
            self.tuning.respawn_delay,
            TimedAction::RespawnPlayer,
        ));
    }

    fn spawn_player(&mut self, at: Vec2) {
        self.spawn_requests.push(SpawnPlayerRequest {
            position: at,
            from_checkpoint: self.checkpoint.is_some(),
        });
    }

    fn request_scene_transition(&mut self, scene: usize) {
        self.scene_requests.push(scene);
    }

    fn add_collectible(&mut self) {
        self.diamonds_collected += 1;
        info!(
            "[SESSION] diamonds {}/{}",
            self.diamonds_collected, self.total_diamonds
        );
    }

    fn open_entrance_door(&mut self) {
        self.entrance_door_open = true;
    }
}

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelSession>()
            .add_systems(Update, flush_spawn_requests);
    }
}

fn flush_spawn_requests(
    mut session: ResMut<LevelSession>,
    mut writer: MessageWriter<SpawnPlayerRequest>,
) {
    for request in session.take_spawn_requests() {
        writer.write(request);
    }
}
