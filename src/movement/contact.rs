//! Movement domain: ground and wall probing.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{Body, ContactState, GameLayer, MovementTuning};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub normal: Vec2,
}

/// Ray queries against level geometry.
pub trait PhysicsQuery {
    /// Cast a ray and return the closest hit within `max_distance` on `mask`.
    ///
    /// `direction` need not be normalized; a zero direction never hits.
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// Turns raw ray casts into a [`ContactState`].
#[derive(Debug, Clone, Copy)]
pub struct ContactClassifier {
    pub foot_spacing: f32,
    pub foot_height: f32,
    pub ray_length: f32,
    pub wall_check_distance: f32,
    /// Layers that count as solid for both the foot and wall rays.
    pub ground_mask: LayerMask,
}

impl ContactClassifier {
    pub fn from_tuning(tuning: &MovementTuning) -> Self {
        Self {
            foot_spacing: tuning.foot_spacing,
            foot_height: tuning.foot_height,
            ray_length: tuning.ray_length,
            wall_check_distance: tuning.wall_check_distance,
            ground_mask: LayerMask::from([GameLayer::Ground, GameLayer::Wall]),
        }
    }

    /// Left and right foot anchors, in world space.
    pub fn foot_anchors(&self, body: &Body) -> [Vec2; 2] {
        let below = body.position - Vec2::new(0.0, self.foot_height);
        [
            below - Vec2::new(self.foot_spacing, 0.0),
            below + Vec2::new(self.foot_spacing, 0.0),
        ]
    }

    /// End point of the wall ray for the body's current facing.
    pub fn wall_probe_end(&self, body: &Body) -> Vec2 {
        body.position + Vec2::X * body.facing.sign() * self.wall_check_distance
    }

    pub fn classify(&self, body: &Body, physics: &dyn PhysicsQuery) -> ContactState {
        let grounded = self.foot_anchors(body).into_iter().any(|foot| {
            physics
                .cast_ray(foot, Vec2::NEG_Y, self.ray_length, self.ground_mask)
                .is_some()
        });

        let wall_detected = physics
            .cast_ray(
                body.position,
                Vec2::X * body.facing.sign(),
                self.wall_check_distance,
                self.ground_mask,
            )
            .is_some();

        ContactState {
            grounded,
            wall_detected,
        }
    }
}
