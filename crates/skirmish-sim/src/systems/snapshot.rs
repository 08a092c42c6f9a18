//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use skirmish_core::components::*;
use skirmish_core::enums::GamePhase;
use skirmish_core::events::SimEvent;
use skirmish_core::state::*;
use skirmish_core::types::SimTime;

use super::wave_spawner::SpawnDirector;
use crate::ids::entity_id;
use crate::scoring::ScoreState;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    director: &SpawnDirector,
    score: &ScoreState,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        wave: director.wave,
        live_combatants: director.live_count(),
        score: score.view(),
        player: build_player(world),
        combatants: build_combatants(world),
        pickups: build_pickups(world),
        events,
    }
}

fn build_player(world: &World) -> Option<PlayerView> {
    world
        .query::<(&Player, &Transform, &Health, Option<&Weapon>)>()
        .iter()
        .next()
        .map(|(entity, (_, transform, health, weapon))| PlayerView {
            id: entity_id(entity),
            position: transform.position,
            yaw: transform.yaw,
            health: health.current,
            starting_health: health.starting,
            dead: health.is_dead,
            weapon: weapon.map(build_weapon),
        })
}

fn build_weapon(weapon: &Weapon) -> WeaponView {
    WeaponView {
        mode: weapon.mode,
        mag_ammo: weapon.mag_ammo,
        magazine_capacity: weapon.stats.magazine_capacity,
        reserve_ammo: weapon.reserve_ammo,
        spread: weapon.current_spread,
        enabled: weapon.enabled,
        tracer: weapon.tracer,
    }
}

/// Every combatant, living or corpse, ordered by id.
fn build_combatants(world: &World) -> Vec<CombatantView> {
    let mut combatants: Vec<CombatantView> = world
        .query::<(&Combatant, &Transform, &Health, &NavAgent, Option<&Skin>)>()
        .iter()
        .map(|(entity, (combatant, transform, health, agent, skin))| CombatantView {
            id: entity_id(entity),
            position: transform.position,
            yaw: transform.yaw,
            mode: combatant.mode,
            target: combatant.target,
            health: health.current,
            dead: health.is_dead,
            speed: agent.velocity.length(),
            tint: skin.map(|s| s.tint).unwrap_or_default(),
        })
        .collect();

    combatants.sort_by_key(|c| c.id);
    combatants
}

fn build_pickups(world: &World) -> Vec<PickupView> {
    let mut pickups: Vec<PickupView> = world
        .query::<(&Pickup, &Transform)>()
        .iter()
        .map(|(entity, (pickup, transform))| PickupView {
            id: entity_id(entity),
            position: transform.position,
            pickup: *pickup,
        })
        .collect();

    pickups.sort_by_key(|p| p.id);
    pickups
}
