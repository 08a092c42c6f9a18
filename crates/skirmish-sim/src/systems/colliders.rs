//! Collider sync: mirrors entity colliders into the spatial service.

use hecs::World;

use skirmish_core::components::{Collider, Transform};
use skirmish_core::services::SpatialQuery;

use crate::ids::entity_id;

/// Push every enabled collider's current position to the spatial service
/// and drop the disabled ones.
pub fn run(world: &World, physics: &mut dyn SpatialQuery) {
    for (entity, (transform, collider)) in world.query::<(&Transform, &Collider)>().iter() {
        let id = entity_id(entity);
        if collider.enabled {
            physics.sync_collider(id, transform.position, collider.radius, collider.layer);
        } else {
            physics.remove_collider(id);
        }
    }
}
