//! Simulation constants and tuning parameters.
//!
//! Per-entity tuning (weapon stats, combatant ranges, spawner bounds) lives
//! in [`crate::config`]; the values here are fixed properties of the model.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Perception ---

/// Interval of the low-rate perception / routing tick (seconds).
pub const PERCEPTION_INTERVAL_SECS: f64 = 0.05;

/// Radius around a combatant searched for the next patrol destination.
pub const PATROL_RADIUS: f32 = 20.0;

/// A patrolling combatant re-routes once this close to its destination.
pub const PATROL_ARRIVAL_DISTANCE: f32 = 1.0;

/// Navigation area mask accepted by patrol routing (every area).
pub const ALL_NAV_AREAS: u32 = u32::MAX;

// --- Combat ---

/// Maximum number of hits considered by one melee sweep.
pub const MAX_SWEEP_HITS: usize = 10;

/// How long a shot tracer stays visible (seconds).
pub const SHOT_EFFECT_SECS: f64 = 0.04;

// --- Spawning & scoring ---

/// Combatants spawned per wave number.
pub const COMBATANTS_PER_WAVE: u32 = 5;

/// Patrol speed of a spawned combatant as a fraction of its run speed.
pub const PATROL_SPEED_FACTOR: f32 = 0.3;

/// Delay between a spawned combatant's death and removal of its corpse.
pub const CORPSE_CLEANUP_SECS: f64 = 10.0;

/// Score awarded for each spawned combatant killed.
pub const KILL_SCORE: u32 = 100;

/// Radius of the trigger collider around a pickup.
pub const PICKUP_COLLIDER_RADIUS: f32 = 0.5;

// --- Agents ---

/// Distance at which an agent considers a waypoint reached.
pub const WAYPOINT_TOLERANCE: f32 = 0.05;
