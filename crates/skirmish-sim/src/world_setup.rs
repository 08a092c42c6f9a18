//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player, combatants and pickups with the component bundles
//! the systems expect. Spawning never touches the spatial service;
//! the engine registers colliders through the collider sync.

use glam::Vec3;
use hecs::{Entity, World};

use skirmish_core::components::*;
use skirmish_core::config::{CombatantConfig, PlayerConfig, WeaponConfig};
use skirmish_core::constants::PICKUP_COLLIDER_RADIUS;
use skirmish_core::enums::*;
use skirmish_core::types::{LayerMask, Tint};

/// A freshly equipped weapon: full magazine, no spread, never fired.
pub fn new_weapon(stats: WeaponConfig) -> Weapon {
    Weapon {
        mode: WeaponMode::Ready,
        mag_ammo: stats.magazine_capacity,
        reserve_ammo: stats.reserve_ammo,
        current_spread: 0.0,
        spread_velocity: 0.0,
        last_fire_secs: None,
        enabled: true,
        tracer: None,
        stats,
    }
}

/// Spawn the player at its configured spawn point, armed.
pub fn spawn_player(world: &mut World, player: &PlayerConfig, weapon: &WeaponConfig) -> Entity {
    world.spawn((
        Player,
        Transform {
            position: player.spawn.position,
            yaw: player.spawn.yaw,
        },
        Health::new(player.starting_health),
        PlayerMotion::default(),
        new_weapon(weapon.clone()),
        Collider {
            radius: player.collider_radius,
            layer: LayerMask::PLAYER,
            enabled: true,
        },
    ))
}

/// Spawn a patrolling combatant with already-scaled stats.
pub fn spawn_combatant(
    world: &mut World,
    position: Vec3,
    yaw: f32,
    stats: CombatantConfig,
    tint: Tint,
) -> Entity {
    let agent = NavAgent {
        enabled: true,
        speed: stats.patrol_speed,
        ..Default::default()
    };
    let collider = Collider {
        radius: stats.collider_radius,
        layer: LayerMask::COMBATANT,
        enabled: true,
    };

    world.spawn((
        Combatant {
            mode: CombatantMode::Patrol,
            target: None,
            recent_hits: Vec::new(),
            turn_velocity: 0.0,
            stats: stats.clone(),
        },
        Transform { position, yaw },
        Health::new(stats.starting_health),
        agent,
        collider,
        Skin { tint },
    ))
}

/// Spawn a pickup lying at `position`.
pub fn spawn_pickup(world: &mut World, pickup: Pickup, position: Vec3) -> Entity {
    world.spawn((
        pickup,
        Transform { position, yaw: 0.0 },
        Collider {
            radius: PICKUP_COLLIDER_RADIUS,
            layer: LayerMask::PICKUP,
            enabled: true,
        },
    ))
}
