use cgmath::{InnerSpace, Vector3};
use rapier3d::prelude::*;

use super::util::{npoint_to_cgvec, nvec_to_cgmath, vec_to_npoint, vec_to_nvec};

/// Result of a ray query against the walkable-surface set. `normal` is the
/// world-space surface normal at the hit point.
#[derive(Clone, Copy, Debug)]
pub struct NavRayHit {
    pub distance: f32,
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

/// The navigation meshes: a set of static colliders describing walkable
/// surfaces. The locomotion core only ever raycasts against it; nothing in
/// here steps a simulation.
pub struct NavMeshSet {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    query_pipeline: QueryPipeline,
    dirty: bool,
}

impl NavMeshSet {
    pub fn new() -> NavMeshSet {
        NavMeshSet {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    pub fn add_walkable(&mut self, collider: Collider) -> ColliderHandle {
        self.dirty = true;
        self.colliders.insert(collider)
    }

    /// Refresh the query acceleration structure. Must be called after the
    /// last `add_walkable` before any ray queries.
    pub fn rebuild(&mut self) {
        self.query_pipeline.update(&self.colliders);
        self.dirty = false;
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Cast a ray and return the closest hit within `max_distance`.
    /// `direction` does not need to be normalized.
    pub fn cast_ray(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<NavRayHit> {
        debug_assert!(!self.dirty, "NavMeshSet queried without rebuild()");

        let length = direction.magnitude();
        if length <= f32::EPSILON {
            return None;
        }

        let ray = Ray::new(vec_to_npoint(origin), vec_to_nvec(direction / length));
        let (_, intersection) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
        )?;

        let distance = intersection.time_of_impact;
        Some(NavRayHit {
            distance,
            point: npoint_to_cgvec(ray.point_at(distance)),
            normal: nvec_to_cgmath(intersection.normal),
        })
    }
}

impl Default for NavMeshSet {
    fn default() -> Self {
        Self::new()
    }
}
