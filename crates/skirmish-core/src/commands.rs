//! Commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Each one
//! maps to an engine operation that may be rejected; rejections leave the
//! simulation unchanged.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::AttackCue;
use crate::types::EntityId;

/// All host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Weapon ---
    /// Fire the player's weapon toward a world point.
    Fire { aim_target: Vec3 },
    /// Start reloading the player's weapon.
    Reload,
    /// Equip (true) or holster (false) the player's weapon.
    SetWeaponEnabled { enabled: bool },

    // --- Locomotion ---
    /// Set the movement input (x = strafe, y = forward).
    Move { input: Vec2 },
    /// Turn the player toward a yaw in degrees.
    Face { yaw: f32 },

    // --- World interaction ---
    /// The player uses a pickup.
    UsePickup { pickup: EntityId },
    /// Animation cue for a combatant's melee damage window.
    AttackCue { combatant: EntityId, cue: AttackCue },
    /// Scripted death of any living entity.
    Kill { entity: EntityId },

    // --- Simulation control ---
    Pause,
    Resume,
}
