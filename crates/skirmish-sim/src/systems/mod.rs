//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components, the timer queue
//! and the spawn director.

pub mod cleanup;
pub mod colliders;
pub mod combatant;
pub mod damage;
pub mod melee;
pub mod navigation;
pub mod perception;
pub mod pickups;
pub mod player_motion;
pub mod snapshot;
pub mod wave_spawner;
pub mod weapon;
