//! Combatant state application: frame-tick transitions, facing, and the
//! attack cue entry point.
//!
//! Transitions are decided by `skirmish_ai::fsm`; this module applies the
//! resulting updates to the ECS components and emits the matching events.

use glam::Vec3;
use hecs::{Entity, World};

use skirmish_ai::fsm::{self, CombatantContext, CombatantUpdate, Movement, TargetStatus, Trigger};
use skirmish_core::components::{Combatant, Health, NavAgent, Transform};
use skirmish_core::config::{CombatantConfig, CueSource};
use skirmish_core::constants::DT;
use skirmish_core::enums::{AttackCue, CombatantMode};
use skirmish_core::events::SimEvent;
use skirmish_core::math::smooth_damp_angle;
use skirmish_core::types::{yaw_towards, EntityId};

use crate::ids::{entity_id, resolve};
use crate::outbox::Outbox;
use crate::timers::{TaskKind, TimerQueue};

/// Current time and cue source, shared by every combatant update.
#[derive(Debug, Clone, Copy)]
pub struct CueClock {
    pub cues: CueSource,
    pub now: f64,
}

/// Melee stopping distance: reach to the attack root plus the sweep radius.
pub fn attack_distance(stats: &CombatantConfig) -> f32 {
    stats.attack_reach + stats.attack_radius
}

/// Status of the held target as seen from `position`, and where it is.
pub fn target_status(
    world: &World,
    position: Vec3,
    target: Option<EntityId>,
) -> (TargetStatus, Option<Vec3>) {
    let Some(id) = target else {
        return (TargetStatus::None, None);
    };
    let Some(entity) = resolve(world, id) else {
        return (TargetStatus::Lost, None);
    };

    let alive = world
        .get::<&Health>(entity)
        .map(|health| !health.is_dead)
        .unwrap_or(false);
    let target_position = world.get::<&Transform>(entity).map(|t| t.position).ok();

    match (alive, target_position) {
        (true, Some(p)) => (
            TargetStatus::Live {
                distance: position.distance(p),
            },
            Some(p),
        ),
        _ => (TargetStatus::Lost, None),
    }
}

/// Point the agent somewhere new, discarding the old path.
pub fn set_destination(agent: &mut NavAgent, destination: Vec3) {
    agent.destination = Some(destination);
    agent.path.clear();
}

/// Apply an FSM update to a combatant's components.
pub fn apply_update(
    world: &World,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
    entity: Entity,
    update: &CombatantUpdate,
    target_position: Option<Vec3>,
) {
    let (from, stats) = {
        let Ok(mut combatant) = world.get::<&mut Combatant>(entity) else {
            return;
        };
        let from = combatant.mode;
        combatant.mode = update.new_mode;
        if update.drop_target {
            combatant.target = None;
        }
        if update.clear_hits {
            combatant.recent_hits.clear();
        }
        (from, combatant.stats.clone())
    };

    if let Ok(mut agent) = world.get::<&mut NavAgent>(entity) {
        match update.movement {
            Movement::Keep => {}
            Movement::Patrol => {
                agent.stopped = false;
                agent.speed = stats.patrol_speed;
                agent.stopping_distance = 0.0;
                agent.destination = None;
                agent.path.clear();
            }
            Movement::Chase => {
                agent.stopped = false;
                agent.speed = stats.run_speed;
                agent.stopping_distance = attack_distance(&stats);
                if let Some(p) = target_position {
                    set_destination(&mut agent, p);
                }
            }
            Movement::Halt => {
                agent.stopped = true;
                agent.velocity = Vec3::ZERO;
            }
        }
    }

    let id = entity_id(entity);
    if update.mode_changed {
        log::trace!("combatant {:?}: {:?} -> {:?}", id, from, update.new_mode);
        outbox.emit(SimEvent::ModeChanged {
            combatant: id,
            from,
            to: update.new_mode,
        });

        // Cues scheduled for the mode being left are stale.
        timers.cancel(entity, |kind| matches!(kind, TaskKind::AttackCue(_)));
        if let (CombatantMode::Attacking, CueSource::Scripted { window_secs, .. }) =
            (update.new_mode, clock.cues)
        {
            timers.schedule(
                entity,
                clock.now + window_secs,
                TaskKind::AttackCue(AttackCue::End),
            );
        }
    }

    if update.windup_started {
        outbox.emit(SimEvent::AttackWindup { combatant: id });
        if let CueSource::Scripted { windup_secs, .. } = clock.cues {
            timers.schedule(
                entity,
                clock.now + windup_secs,
                TaskKind::AttackCue(AttackCue::Begin),
            );
        }
    }
}

/// Frame tick: enter the windup when in range, and keep facing the target
/// while winding up or attacking.
pub fn run_frame(world: &World, timers: &mut TimerQueue, outbox: &mut Outbox, clock: CueClock) {
    let combatants: Vec<(Entity, CombatantMode, Option<EntityId>, Vec3, f32)> = world
        .query::<(&Combatant, &Transform, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| !health.is_dead)
        .map(|(entity, (combatant, transform, _))| {
            (
                entity,
                combatant.mode,
                combatant.target,
                transform.position,
                attack_distance(&combatant.stats),
            )
        })
        .collect();

    for (entity, mode, target, position, attack_distance) in combatants {
        let (status, target_position) = target_status(world, position, target);
        let update = fsm::evaluate(&CombatantContext {
            mode,
            target: status,
            attack_distance,
            trigger: Trigger::Frame,
        });
        apply_update(world, timers, outbox, clock, entity, &update, target_position);

        if matches!(
            update.new_mode,
            CombatantMode::AttackWindup | CombatantMode::Attacking
        ) {
            if let Some(p) = target_position {
                face_towards(world, entity, p);
            }
        }
    }
}

fn face_towards(world: &World, entity: Entity, point: Vec3) {
    let (Ok(mut transform), Ok(mut combatant)) = (
        world.get::<&mut Transform>(entity),
        world.get::<&mut Combatant>(entity),
    ) else {
        return;
    };
    let Some(desired) = yaw_towards(point - transform.position) else {
        return;
    };
    let smooth_time = combatant.stats.turn_smooth_time;
    transform.yaw = smooth_damp_angle(
        transform.yaw,
        desired,
        &mut combatant.turn_velocity,
        smooth_time,
        f32::INFINITY,
        DT,
    );
}

/// Deliver an attack animation cue. Returns false when the combatant is
/// dead, unknown, or not in the mode the cue belongs to.
pub fn handle_cue(
    world: &World,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
    entity: Entity,
    cue: AttackCue,
) -> bool {
    let alive = world
        .get::<&Health>(entity)
        .map(|health| !health.is_dead)
        .unwrap_or(false);
    if !alive {
        return false;
    }

    let (mode, target, position, attack_distance) = {
        let (Ok(combatant), Ok(transform)) = (
            world.get::<&Combatant>(entity),
            world.get::<&Transform>(entity),
        ) else {
            return false;
        };
        (
            combatant.mode,
            combatant.target,
            transform.position,
            attack_distance(&combatant.stats),
        )
    };

    if !fsm::accepts_cue(mode, cue) {
        log::debug!(
            "combatant {:?} rejected {:?} cue in {:?}",
            entity_id(entity),
            cue,
            mode
        );
        return false;
    }

    let (status, target_position) = target_status(world, position, target);
    let update = fsm::evaluate(&CombatantContext {
        mode,
        target: status,
        attack_distance,
        trigger: Trigger::Cue(cue),
    });
    apply_update(world, timers, outbox, clock, entity, &update, target_position);
    true
}
