//! Navigation system: moves agents along their waypoint paths.
//!
//! Paths are requested lazily from the navigation service when an agent
//! has a destination but no waypoints. An agent halts once its remaining
//! path is within its stopping distance.

use glam::Vec3;
use hecs::World;

use skirmish_core::components::{Combatant, NavAgent, Transform};
use skirmish_core::constants::{DT, WAYPOINT_TOLERANCE};
use skirmish_core::enums::CombatantMode;
use skirmish_core::services::Navigation;
use skirmish_core::types::yaw_towards;

/// Path length still to travel from `position`.
pub fn remaining_distance(agent: &NavAgent, position: Vec3) -> f32 {
    match (agent.path.first(), agent.destination) {
        (Some(first), _) => {
            let mut total = position.distance(*first);
            for pair in agent.path.windows(2) {
                total += pair[0].distance(pair[1]);
            }
            total
        }
        (None, Some(destination)) => position.distance(destination),
        (None, None) => 0.0,
    }
}

pub fn run(world: &mut World, navigation: &dyn Navigation) {
    for (_entity, (transform, agent, combatant)) in
        world.query_mut::<(&mut Transform, &mut NavAgent, Option<&Combatant>)>()
    {
        if !agent.enabled || agent.stopped {
            agent.velocity = Vec3::ZERO;
            continue;
        }
        let Some(destination) = agent.destination else {
            agent.velocity = Vec3::ZERO;
            continue;
        };

        let start = transform.position;
        if agent.path.is_empty() {
            if start.distance(destination) <= WAYPOINT_TOLERANCE {
                agent.velocity = Vec3::ZERO;
                continue;
            }
            agent.path = navigation.find_path(start, destination);
            if agent.path.is_empty() {
                log::debug!("no path from {} to {}", start, destination);
                agent.destination = None;
                agent.velocity = Vec3::ZERO;
                continue;
            }
        }

        // Agents close to just inside their stopping distance, so range
        // checks against that distance hold once they halt.
        let stop_at = (agent.stopping_distance - WAYPOINT_TOLERANCE).max(0.0);
        let remaining = remaining_distance(agent, start);
        let mut budget = (agent.speed * DT).min(remaining - stop_at);
        let mut position = start;

        while budget > 0.0 {
            let Some(&waypoint) = agent.path.first() else {
                break;
            };
            let leg = position.distance(waypoint);
            if leg <= budget || leg <= WAYPOINT_TOLERANCE {
                position = waypoint;
                budget -= leg;
                agent.path.remove(0);
            } else {
                position += (waypoint - position) / leg * budget;
                budget = 0.0;
            }
        }

        let delta = position - start;
        agent.velocity = delta / DT;
        transform.position = position;

        // Agents face where they walk, except while squaring up for a strike.
        let attacking = combatant.is_some_and(|c| {
            matches!(
                c.mode,
                CombatantMode::AttackWindup | CombatantMode::Attacking
            )
        });
        if !attacking {
            if let Some(yaw) = yaw_towards(delta) {
                transform.yaw = yaw;
            }
        }
    }
}
