//! Pickup system: one-shot health and ammo transfers.

use hecs::{Entity, World};

use skirmish_core::components::{Collider, Health, Pickup, Player, Transform};
use skirmish_core::events::SimEvent;
use skirmish_core::services::SpatialQuery;
use skirmish_core::types::LayerMask;

use super::{damage, weapon};
use crate::ids::{entity_id, resolve};
use crate::outbox::Outbox;

/// Use `pickup` on `user`. The pickup is consumed whether or not the user
/// had anything it could refill. Returns false when `pickup` is not a
/// pickup (or was already used) or `user` does not exist.
pub fn use_pickup(
    world: &mut World,
    physics: &mut dyn SpatialQuery,
    outbox: &mut Outbox,
    despawn_buffer: &mut Vec<Entity>,
    pickup: Entity,
    user: Entity,
) -> bool {
    if pickup == user || !world.contains(user) {
        return false;
    }
    let Ok(kind) = world.remove_one::<Pickup>(pickup) else {
        return false;
    };

    if let Ok(mut collider) = world.get::<&mut Collider>(pickup) {
        collider.enabled = false;
    }
    let pickup_id = entity_id(pickup);
    physics.remove_collider(pickup_id);
    despawn_buffer.push(pickup);

    let applied = match kind {
        Pickup::Health { amount } => damage::restore(world, user, amount),
        Pickup::Ammo { rounds } => weapon::add_reserve(world, user, rounds),
    };
    log::debug!(
        "{:?} used by {:?} (applied: {})",
        kind,
        entity_id(user),
        applied
    );

    outbox.emit(SimEvent::PickupUsed {
        pickup: pickup_id,
        user: entity_id(user),
        applied,
    });
    true
}

/// The living player uses every pickup overlapping its reach sphere.
pub fn auto_use(
    world: &mut World,
    physics: &mut dyn SpatialQuery,
    outbox: &mut Outbox,
    despawn_buffer: &mut Vec<Entity>,
    reach: f32,
) {
    let player = world
        .query::<(&Player, &Transform, &Health)>()
        .iter()
        .find(|(_, (_, _, health))| !health.is_dead)
        .map(|(entity, (_, transform, _))| (entity, transform.position));
    let Some((player, position)) = player else {
        return;
    };

    let touching = physics.overlap_sphere(position, reach, LayerMask::PICKUP);
    for id in touching {
        if let Some(pickup) = resolve(world, id) {
            use_pickup(world, physics, outbox, despawn_buffer, pickup, player);
        }
    }
}
