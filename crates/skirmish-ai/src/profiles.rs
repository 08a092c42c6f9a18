//! Intensity-driven combatant profiles.
//!
//! Every spawned combatant rolls a single intensity in [0, 1] that places
//! it between the weakest and strongest configured combatant.

use rand::Rng;
use skirmish_core::config::{CombatantConfig, SpawnerConfig};
use skirmish_core::constants::PATROL_SPEED_FACTOR;
use skirmish_core::enums::SpeedScaling;
use skirmish_core::math::lerp;
use skirmish_core::types::Tint;

/// Per-spawn parameters derived from an intensity roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatantProfile {
    pub intensity: f32,
    pub health: f32,
    pub damage: f32,
    pub run_speed: f32,
    pub patrol_speed: f32,
    pub tint: Tint,
}

/// Build the profile for a given intensity.
pub fn profile_for_intensity(intensity: f32, spawner: &SpawnerConfig) -> CombatantProfile {
    let intensity = intensity.clamp(0.0, 1.0);

    let run_speed = match spawner.speed_scaling {
        SpeedScaling::Flat => spawner.speed_min,
        SpeedScaling::Scaled => lerp(spawner.speed_min, spawner.speed_max, intensity),
    };

    CombatantProfile {
        intensity,
        health: lerp(spawner.health_min, spawner.health_max, intensity),
        damage: lerp(spawner.damage_min, spawner.damage_max, intensity),
        run_speed,
        patrol_speed: run_speed * PATROL_SPEED_FACTOR,
        tint: Tint::WHITE.lerp(spawner.strong_tint, intensity),
    }
}

/// Roll an intensity uniformly in [0, 1] and build its profile.
pub fn roll_profile<R: Rng>(rng: &mut R, spawner: &SpawnerConfig) -> CombatantProfile {
    let intensity: f32 = rng.gen_range(0.0..=1.0);
    profile_for_intensity(intensity, spawner)
}

impl CombatantProfile {
    /// Base combatant tuning with this profile's scaled values applied.
    pub fn apply_to(&self, base: &CombatantConfig) -> CombatantConfig {
        CombatantConfig {
            starting_health: self.health,
            damage: self.damage,
            run_speed: self.run_speed,
            patrol_speed: self.patrol_speed,
            ..base.clone()
        }
    }
}
