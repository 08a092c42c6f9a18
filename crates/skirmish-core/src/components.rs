//! ECS components for hecs entities.
//!
//! Components are plain data structs. Behaviour lives in the simulation
//! systems; the only exception is the health pool, whose damage protocol
//! is shared by every system and lives in [`crate::living`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{CombatantConfig, WeaponConfig};
use crate::enums::*;
use crate::types::{EntityId, LayerMask, Tint};

/// World placement. Position is the body centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Facing in degrees (0 = +Z).
    pub yaw: f32,
}

/// Health pool of a living entity.
///
/// Invariants: `0 <= current <= starting`, `is_dead == (current <= 0)`,
/// and once dead the pool never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub starting: f32,
    pub current: f32,
    pub is_dead: bool,
}

/// Shot tracer currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tracer {
    pub from: Vec3,
    pub to: Vec3,
}

/// Hitscan weapon carried by an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub stats: WeaponConfig,
    pub mode: WeaponMode,
    pub mag_ammo: u32,
    pub reserve_ammo: u32,
    /// Current spread (standard deviation of the aim error, degrees).
    pub current_spread: f32,
    /// Smoothing velocity of the recoil settle.
    pub spread_velocity: f32,
    /// Simulation time of the last shot; `None` until the first shot after
    /// the weapon is enabled.
    pub last_fire_secs: Option<f64>,
    /// Disabled weapons neither fire, reload nor settle recoil.
    pub enabled: bool,
    pub tracer: Option<Tracer>,
}

/// AI-controlled melee combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub mode: CombatantMode,
    /// Held target. Present exactly when `mode` is not `Patrol`.
    pub target: Option<EntityId>,
    /// Entities already struck in the current damage window.
    pub recent_hits: Vec<EntityId>,
    /// Per-spawn tuning (health, damage and speeds already scaled).
    pub stats: CombatantConfig,
    /// Smoothing velocity of the yaw while facing a target.
    pub turn_velocity: f32,
}

/// Navigation agent state. Paths come from the navigation service;
/// the simulation moves the agent along them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavAgent {
    /// Disabled agents never move (dead combatants).
    pub enabled: bool,
    /// Halted agents keep their path but do not advance.
    pub stopped: bool,
    pub speed: f32,
    /// The agent halts once this close to its final destination.
    pub stopping_distance: f32,
    pub destination: Option<Vec3>,
    /// Remaining waypoints, ending at the destination.
    pub path: Vec<Vec3>,
    /// Velocity over the last frame tick.
    pub velocity: Vec3,
}

/// Sphere collider registered with the spatial service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
    pub layer: LayerMask,
    pub enabled: bool,
}

/// One-shot item transferring a resource to whoever uses it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pickup {
    /// Restores health to an entity with a health pool.
    Health { amount: f32 },
    /// Adds reserve rounds to an entity carrying a weapon.
    Ammo { rounds: u32 },
}

impl Pickup {
    /// Stock health pack.
    pub fn health_pack() -> Self {
        Pickup::Health { amount: 50.0 }
    }

    /// Stock ammo pack.
    pub fn ammo_pack() -> Self {
        Pickup::Ammo { rounds: 30 }
    }
}

/// Marks the player-controlled entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Player locomotion state driven by movement commands.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerMotion {
    /// Requested movement, x = strafe right, y = forward. Length ≤ 1.
    pub move_input: Vec2,
    pub current_speed: f32,
    pub speed_velocity: f32,
    /// Yaw the player is turning toward, if any.
    pub target_yaw: Option<f32>,
    pub turn_velocity: f32,
}

/// Skin tint of a spawned combatant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Skin {
    pub tint: Tint,
}
