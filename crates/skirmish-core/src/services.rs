//! Contracts for the host-provided collaborators.
//!
//! The simulation never reaches into a physics scene or navigation mesh
//! directly. It is handed implementations of these traits when it is
//! built, and everything it learns about geometry comes through them.
//! Absence of a hit or a path is a normal outcome, never an error.

use glam::Vec3;

use crate::types::{EntityId, Hit, LayerMask};

/// Spatial query service (raycasts, overlaps, sweeps).
pub trait SpatialQuery {
    /// Nearest hit along `direction` within `max_distance` on any layer in
    /// `mask`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
        -> Option<Hit>;

    /// Entities whose colliders overlap the sphere, in the service's
    /// iteration order.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<EntityId>;

    /// Every collider touched by a sphere swept along `direction`, nearest
    /// first. Shapes overlapping at the start report distance 0.
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit>;

    /// Move or register the collider owned by `entity`. Hosts that own
    /// their physics scene can ignore this.
    fn sync_collider(&mut self, _entity: EntityId, _center: Vec3, _radius: f32, _layer: LayerMask) {
    }

    /// Drop the collider owned by `entity`.
    fn remove_collider(&mut self, _entity: EntityId) {}
}

/// Navigation service.
pub trait Navigation {
    /// Closest navigable point to `origin` no farther than `max_distance`,
    /// restricted to the areas in `area_mask`.
    fn nearest_navigable_point(&self, origin: Vec3, max_distance: f32, area_mask: u32)
        -> Option<Vec3>;

    /// Waypoints leading from `from` to `to`, ending at `to`. Empty when no
    /// path exists.
    fn find_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3>;
}
