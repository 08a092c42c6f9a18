//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Weapon magazine / reload state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponMode {
    /// Rounds in the magazine; may fire.
    #[default]
    Ready,
    /// Magazine empty; must reload before firing.
    Empty,
    /// Reload in progress; firing and further reloads are rejected.
    Reloading,
}

/// Combatant behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantMode {
    /// Wandering between random navigable points, scanning for targets.
    #[default]
    Patrol,
    /// Chasing a held target.
    Tracking,
    /// In melee range; halted and waiting for the damage window to open.
    AttackWindup,
    /// Damage window open; melee sweeps run every frame tick.
    Attacking,
}

/// Animation cue that opens or closes a melee damage window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackCue {
    Begin,
    End,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// The player died. Combat keeps resolving but no new waves spawn.
    GameOver,
}

/// How a spawned combatant's run speed follows its intensity roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedScaling {
    /// Every combatant runs at the configured minimum speed.
    #[default]
    Flat,
    /// Run speed interpolates between the configured minimum and maximum.
    Scaled,
}
