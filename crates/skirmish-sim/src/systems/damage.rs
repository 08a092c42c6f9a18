//! Damage system: routes damage messages into health pools and queues
//! the resulting deaths.
//!
//! Every hit, whether from a weapon or a melee sweep, goes through
//! [`apply`]. Deaths are only queued here; the engine resolves them once
//! the current operation or tick phase is done.

use hecs::{Entity, World};

use skirmish_ai::fsm::{self, CombatantContext, TargetStatus, Trigger};
use skirmish_core::components::{Combatant, Health, Transform};
use skirmish_core::events::SimEvent;
use skirmish_core::living::{DamageMessage, Damageable};
use skirmish_core::types::EntityId;

use super::combatant::{apply_update, attack_distance, CueClock};
use crate::ids::{entity_id, resolve};
use crate::outbox::{Death, Outbox};
use crate::timers::TimerQueue;

/// Apply `message` to `target`. Returns false when the target has no
/// health pool or is already dead.
pub fn apply(
    world: &World,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
    target: Entity,
    message: &DamageMessage,
) -> bool {
    let (remaining, died) = {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return false;
        };
        if !health.apply_damage(message) {
            return false;
        }
        (health.current, health.is_dead)
    };

    outbox.emit(SimEvent::Damaged {
        target: entity_id(target),
        source: message.source(),
        amount: message.amount(),
        hit_point: message.hit_point(),
        hit_normal: message.hit_normal(),
        remaining,
    });

    if died {
        outbox.deaths.push(Death {
            entity: target,
            killer: message.source(),
        });
    } else if let Some(source) = message.source() {
        retaliate(world, timers, outbox, clock, target, source);
    }
    true
}

/// A combatant hit while holding no target turns on whoever hit it.
fn retaliate(
    world: &World,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
    victim: Entity,
    source: EntityId,
) {
    let Some(attacker) = resolve(world, source) else {
        return;
    };
    if attacker == victim {
        return;
    }
    let attacker_alive = world
        .get::<&Health>(attacker)
        .map(|health| !health.is_dead)
        .unwrap_or(false);
    let Ok(attacker_position) = world.get::<&Transform>(attacker).map(|t| t.position) else {
        return;
    };
    if !attacker_alive {
        return;
    }

    let (mode, reach) = {
        let Ok(mut combatant) = world.get::<&mut Combatant>(victim) else {
            return;
        };
        if combatant.target.is_some() {
            return;
        }
        combatant.target = Some(source);
        (combatant.mode, attack_distance(&combatant.stats))
    };
    let Ok(position) = world.get::<&Transform>(victim).map(|t| t.position) else {
        return;
    };

    log::debug!("combatant {:?} retaliates against {:?}", entity_id(victim), source);
    let update = fsm::evaluate(&CombatantContext {
        mode,
        target: TargetStatus::Live {
            distance: position.distance(attacker_position),
        },
        attack_distance: reach,
        trigger: Trigger::TargetAcquired,
    });
    apply_update(world, timers, outbox, clock, victim, &update, Some(attacker_position));
}

/// Heal `entity`. Returns false without a living health pool.
pub fn restore(world: &World, entity: Entity, amount: f32) -> bool {
    let Ok(mut health) = world.get::<&mut Health>(entity) else {
        return false;
    };
    if health.is_dead {
        return false;
    }
    health.restore(amount);
    true
}

/// Kill `entity` outright. Returns true only for the call that performed
/// the death transition.
pub fn kill(world: &World, outbox: &mut Outbox, entity: Entity) -> bool {
    let Ok(mut health) = world.get::<&mut Health>(entity) else {
        return false;
    };
    if !health.die() {
        return false;
    }
    outbox.deaths.push(Death {
        entity,
        killer: None,
    });
    true
}
