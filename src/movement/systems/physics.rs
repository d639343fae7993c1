//! Movement domain: avian spatial queries behind [`PhysicsQuery`].

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{PhysicsQuery, RayHit};

pub(crate) struct SpatialPhysics<'a, 'w, 's> {
    query: &'a SpatialQuery<'w, 's>,
}

impl<'a, 'w, 's> SpatialPhysics<'a, 'w, 's> {
    pub(crate) fn new(query: &'a SpatialQuery<'w, 's>) -> Self {
        Self { query }
    }
}

impl PhysicsQuery for SpatialPhysics<'_, '_, '_> {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = Dir2::new(direction).ok()?;
        let filter = SpatialQueryFilter::from_mask(mask);
        self.query
            .cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| RayHit {
                distance: hit.distance,
                normal: hit.normal,
            })
    }
}
