//! Cleanup system: despawns consumed pickups and removed corpses.

use hecs::{Entity, World};

use skirmish_core::services::SpatialQuery;

use crate::ids::entity_id;

/// Despawn every entity queued in `despawn_buffer`, dropping its collider
/// from the spatial service first. The buffer is left empty.
pub fn run(world: &mut World, physics: &mut dyn SpatialQuery, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        physics.remove_collider(entity_id(entity));
        let _ = world.despawn(entity);
    }
}
