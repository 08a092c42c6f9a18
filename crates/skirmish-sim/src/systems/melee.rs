//! Melee system: damage sweeps of attacking combatants.
//!
//! While a combatant's damage window is open, a sphere is swept from its
//! attack root along its facing over the distance it moved this tick.
//! The first living hit it has not already struck in this window takes
//! the damage. A target struck by one combatant is skipped by the others
//! for the rest of the tick.

use glam::Vec3;
use hecs::{Entity, World};

use skirmish_core::components::{Combatant, Health, NavAgent, Transform};
use skirmish_core::constants::DT;
use skirmish_core::enums::CombatantMode;
use skirmish_core::living::DamageMessage;
use skirmish_core::services::SpatialQuery;
use skirmish_core::types::{forward_from_yaw, EntityId, LayerMask};

use super::combatant::CueClock;
use super::damage;
use crate::ids::{entity_id, resolve};
use crate::outbox::Outbox;
use crate::timers::TimerQueue;

struct Swing {
    attacker: Entity,
    root: Vec3,
    direction: Vec3,
    distance: f32,
    radius: f32,
    mask: LayerMask,
    damage: f32,
    recent_hits: Vec<EntityId>,
}

pub fn run(
    world: &World,
    physics: &dyn SpatialQuery,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
) {
    let swings: Vec<Swing> = world
        .query::<(&Combatant, &Transform, &Health, &NavAgent)>()
        .iter()
        .filter(|(_, (combatant, _, health, _))| {
            combatant.mode == CombatantMode::Attacking && !health.is_dead
        })
        .map(|(attacker, (combatant, transform, _, agent))| {
            let direction = forward_from_yaw(transform.yaw);
            Swing {
                attacker,
                root: transform.position + direction * combatant.stats.attack_reach,
                direction,
                distance: agent.velocity.length() * DT,
                radius: combatant.stats.attack_radius,
                mask: combatant.stats.target_layers,
                damage: combatant.stats.damage,
                recent_hits: combatant.recent_hits.clone(),
            }
        })
        .collect();

    let mut struck_this_tick: Vec<EntityId> = Vec::new();

    for swing in swings {
        let own_id = entity_id(swing.attacker);
        let hits = physics.sphere_cast_all(
            swing.root,
            swing.radius,
            swing.direction,
            swing.distance,
            swing.mask,
        );

        for hit in hits {
            let Some(id) = hit.entity else {
                continue;
            };
            if id == own_id || swing.recent_hits.contains(&id) || struck_this_tick.contains(&id) {
                continue;
            }
            let Some(target) = resolve(world, id) else {
                continue;
            };
            let alive = world
                .get::<&Health>(target)
                .map(|health| !health.is_dead)
                .unwrap_or(false);
            if !alive {
                continue;
            }

            let hit_point = if hit.distance <= 0.0 {
                swing.root
            } else {
                hit.point
            };
            let message = DamageMessage::new(swing.damage, Some(own_id), hit_point, hit.normal);
            damage::apply(world, timers, outbox, clock, target, &message);

            if let Ok(mut combatant) = world.get::<&mut Combatant>(swing.attacker) {
                combatant.recent_hits.push(id);
            }
            struck_this_tick.push(id);
            break;
        }
    }
}
