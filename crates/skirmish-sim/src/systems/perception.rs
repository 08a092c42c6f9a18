//! Perception system: the low-rate tick that chases held targets, picks
//! patrol destinations and scans for new targets.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_ai::fsm::{self, CombatantContext, TargetStatus, Trigger};
use skirmish_ai::perception::{has_line_of_sight, in_field_of_view, select_target};
use skirmish_core::components::{Combatant, Health, NavAgent, Transform};
use skirmish_core::config::CombatantConfig;
use skirmish_core::constants::{ALL_NAV_AREAS, PATROL_ARRIVAL_DISTANCE, PATROL_RADIUS};
use skirmish_core::enums::CombatantMode;
use skirmish_core::services::{Navigation, SpatialQuery};
use skirmish_core::types::{forward_from_yaw, EntityId, LayerMask};

use super::combatant::{apply_update, attack_distance, set_destination, target_status, CueClock};
use super::navigation::remaining_distance;
use crate::ids::{entity_id, resolve};
use crate::outbox::Outbox;
use crate::timers::TimerQueue;

/// Run one perception pass over every living combatant.
pub fn run(
    world: &World,
    physics: &dyn SpatialQuery,
    navigation: &dyn Navigation,
    rng: &mut ChaCha8Rng,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
) {
    let combatants: Vec<Entity> = world
        .query::<(&Combatant, &Health)>()
        .iter()
        .filter(|(_, (_, health))| !health.is_dead)
        .map(|(entity, _)| entity)
        .collect();

    for entity in combatants {
        let Some((mode, target, position, yaw, stats)) = read_combatant(world, entity) else {
            continue;
        };

        let (status, target_position) = target_status(world, position, target);
        let update = fsm::evaluate(&CombatantContext {
            mode,
            target: status,
            attack_distance: attack_distance(&stats),
            trigger: Trigger::Perception,
        });
        apply_update(world, timers, outbox, clock, entity, &update, target_position);

        if matches!(status, TargetStatus::Live { .. }) {
            continue;
        }

        reroute_patrol(world, navigation, rng, entity, position);

        if let Some((found, found_position)) = scan(world, physics, entity, position, yaw, &stats) {
            if let Ok(mut combatant) = world.get::<&mut Combatant>(entity) {
                combatant.target = Some(found);
            }
            log::debug!("combatant {:?} acquired {:?}", entity_id(entity), found);

            let update = fsm::evaluate(&CombatantContext {
                mode: update.new_mode,
                target: TargetStatus::Live {
                    distance: position.distance(found_position),
                },
                attack_distance: attack_distance(&stats),
                trigger: Trigger::TargetAcquired,
            });
            apply_update(world, timers, outbox, clock, entity, &update, Some(found_position));
        }
    }
}

fn read_combatant(
    world: &World,
    entity: Entity,
) -> Option<(
    CombatantMode,
    Option<EntityId>,
    Vec3,
    f32,
    CombatantConfig,
)> {
    let combatant = world.get::<&Combatant>(entity).ok()?;
    let transform = world.get::<&Transform>(entity).ok()?;
    Some((
        combatant.mode,
        combatant.target,
        transform.position,
        transform.yaw,
        combatant.stats.clone(),
    ))
}

/// Pick a new patrol destination once the current one is (nearly) reached.
fn reroute_patrol(
    world: &World,
    navigation: &dyn Navigation,
    rng: &mut ChaCha8Rng,
    entity: Entity,
    position: Vec3,
) {
    let Ok(mut agent) = world.get::<&mut NavAgent>(entity) else {
        return;
    };
    if !agent.enabled {
        return;
    }
    let arrived = agent.destination.is_none()
        || remaining_distance(&agent, position) <= PATROL_ARRIVAL_DISTANCE;
    if !arrived {
        return;
    }

    let candidate = position + random_in_unit_sphere(rng) * PATROL_RADIUS;
    match navigation.nearest_navigable_point(candidate, PATROL_RADIUS, ALL_NAV_AREAS) {
        Some(point) => set_destination(&mut agent, point),
        None => log::debug!(
            "no navigable patrol point near {} for {:?}",
            candidate,
            entity_id(entity)
        ),
    }
}

fn random_in_unit_sphere(rng: &mut ChaCha8Rng) -> Vec3 {
    for _ in 0..32 {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
    Vec3::ZERO
}

/// First overlapping candidate that is alive, inside the view cone and in
/// direct line of sight.
fn scan(
    world: &World,
    physics: &dyn SpatialQuery,
    entity: Entity,
    position: Vec3,
    yaw: f32,
    stats: &CombatantConfig,
) -> Option<(EntityId, Vec3)> {
    let own_id = entity_id(entity);
    let eye = position + Vec3::Y * stats.eye_height;
    let forward = forward_from_yaw(yaw);
    let sight_mask = stats.target_layers | LayerMask::ENVIRONMENT;

    let candidates = physics.overlap_sphere(eye, stats.view_distance, stats.target_layers);
    let mut found_position = Vec3::ZERO;

    let found = select_target(candidates, |id| {
        if id == own_id {
            return false;
        }
        let Some(candidate) = resolve(world, id) else {
            return false;
        };
        let Ok(candidate_position) = world.get::<&Transform>(candidate).map(|t| t.position) else {
            return false;
        };
        if !in_field_of_view(eye, forward, candidate_position, stats.field_of_view) {
            return false;
        }
        if !has_line_of_sight(
            physics,
            eye,
            id,
            candidate_position,
            stats.view_distance,
            sight_mask,
        ) {
            return false;
        }
        let alive = world
            .get::<&Health>(candidate)
            .map(|health| !health.is_dead)
            .unwrap_or(false);
        if alive {
            found_position = candidate_position;
        }
        alive
    })?;

    Some((found, found_position))
}
