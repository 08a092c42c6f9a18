//! Mapping between hecs entity handles and the opaque ids handed to
//! collaborators and the host.

use hecs::{Entity, World};
use skirmish_core::types::EntityId;

pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Resolve an id to a live entity. Stale and unknown ids give `None`.
pub fn resolve(world: &World, id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0).filter(|&entity| world.contains(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_stale_ids() {
        let mut world = World::new();
        let entity = world.spawn((1u32,));
        let id = entity_id(entity);
        assert_eq!(resolve(&world, id), Some(entity));

        world.despawn(entity).unwrap();
        assert_eq!(resolve(&world, id), None);
        assert_eq!(resolve(&world, EntityId(0)), None);
    }
}
