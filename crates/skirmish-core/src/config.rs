//! Tuning data for a simulation run.
//!
//! Every struct deserializes with all fields optional; anything omitted
//! falls back to the stock tuning below. Call [`SimConfig::validate`]
//! (done by `SimConfig::load` and by the engine) before using a config.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::Pickup;
use crate::enums::SpeedScaling;
use crate::error::ConfigError;
use crate::types::{LayerMask, Tint};

/// Top-level configuration for one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub weapon: WeaponConfig,
    pub combatant: CombatantConfig,
    pub spawner: SpawnerConfig,
    pub player: PlayerConfig,
    /// Pickups placed in the world when the simulation starts.
    pub pickups: Vec<PickupPlacement>,
    /// Where melee damage-window cues come from.
    pub attack_cues: CueSource,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            weapon: WeaponConfig::default(),
            combatant: CombatantConfig::default(),
            spawner: SpawnerConfig::default(),
            player: PlayerConfig::default(),
            pickups: Vec::new(),
            attack_cues: CueSource::default(),
        }
    }
}

/// Hitscan weapon tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Damage per hit.
    pub damage: f32,
    /// Maximum ray length of a shot.
    pub fire_distance: f32,
    pub magazine_capacity: u32,
    /// Reserve rounds carried when the weapon is first equipped.
    pub reserve_ammo: u32,
    /// Minimum seconds between two shots.
    pub time_between_shots: f64,
    /// Seconds from reload request to rounds transferred.
    pub reload_time: f64,
    /// Upper bound on accumulated spread (degrees of standard deviation).
    pub max_spread: f32,
    /// Spread gained per shot is `1 / stability`.
    pub stability: f32,
    /// Recoil settles with smoothing time `1 / restore_from_recoil_speed`.
    pub restore_from_recoil_speed: f32,
    /// Layers shots pass through (the shooter's own layer, pickups).
    pub exclude_layers: LayerMask,
    /// Muzzle height above the shooter's position.
    pub muzzle_height: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            damage: 25.0,
            fire_distance: 100.0,
            magazine_capacity: 30,
            reserve_ammo: 100,
            time_between_shots: 0.12,
            reload_time: 1.8,
            max_spread: 3.0,
            stability: 1.0,
            restore_from_recoil_speed: 2.0,
            exclude_layers: LayerMask::PLAYER | LayerMask::PICKUP,
            muzzle_height: 0.4,
        }
    }
}

/// Base combatant tuning. Health, damage and speeds are overridden per
/// spawn by the spawn director's intensity roll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantConfig {
    pub starting_health: f32,
    pub damage: f32,
    pub run_speed: f32,
    pub patrol_speed: f32,
    /// Radius of the melee sweep sphere.
    pub attack_radius: f32,
    /// Distance from the body centre to the melee sweep origin.
    pub attack_reach: f32,
    /// Full view cone angle in degrees.
    pub field_of_view: f32,
    pub view_distance: f32,
    /// Smoothing time for turning toward a target while attacking.
    pub turn_smooth_time: f32,
    /// Eye height above the body centre.
    pub eye_height: f32,
    pub collider_radius: f32,
    /// Layers this combatant perceives and attacks.
    pub target_layers: LayerMask,
}

impl Default for CombatantConfig {
    fn default() -> Self {
        Self {
            starting_health: 100.0,
            damage: 30.0,
            run_speed: 10.0,
            patrol_speed: 3.0,
            attack_radius: 2.0,
            attack_reach: 1.0,
            field_of_view: 50.0,
            view_distance: 10.0,
            turn_smooth_time: 0.1,
            eye_height: 0.5,
            collider_radius: 0.5,
            target_layers: LayerMask::PLAYER,
        }
    }
}

/// A position (and facing) new entities may appear at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    /// Initial yaw in degrees.
    #[serde(default)]
    pub yaw: f32,
}

/// Wave spawner tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// When false no waves are spawned.
    pub enabled: bool,
    pub health_min: f32,
    pub health_max: f32,
    pub damage_min: f32,
    pub damage_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_scaling: SpeedScaling,
    /// Tint of a full-intensity combatant (weak ones stay white).
    pub strong_tint: Tint,
    pub spawn_points: Vec<SpawnPoint>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        let corner = |x: f32, z: f32, yaw: f32| SpawnPoint {
            position: Vec3::new(x, 0.0, z),
            yaw,
        };
        Self {
            enabled: true,
            health_min: 100.0,
            health_max: 200.0,
            damage_min: 20.0,
            damage_max: 40.0,
            speed_min: 3.0,
            speed_max: 12.0,
            speed_scaling: SpeedScaling::default(),
            strong_tint: Tint::RED,
            spawn_points: vec![
                corner(15.0, 15.0, 225.0),
                corner(-15.0, 15.0, 135.0),
                corner(15.0, -15.0, 315.0),
                corner(-15.0, -15.0, 45.0),
            ],
        }
    }
}

/// Player character tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: SpawnPoint,
    pub starting_health: f32,
    /// Top movement speed at full input.
    pub speed: f32,
    pub speed_smooth_time: f32,
    pub turn_smooth_time: f32,
    pub collider_radius: f32,
    /// Pickups overlapping this sphere around the player are used.
    pub pickup_reach: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnPoint {
                position: Vec3::ZERO,
                yaw: 0.0,
            },
            starting_health: 100.0,
            speed: 6.0,
            speed_smooth_time: 0.1,
            turn_smooth_time: 0.1,
            collider_radius: 0.5,
            pickup_reach: 0.75,
        }
    }
}

/// A pickup placed at simulation start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PickupPlacement {
    pub pickup: Pickup,
    pub position: Vec3,
}

/// Source of the melee damage-window cues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CueSource {
    /// Cues arrive only through `AttackCue` commands from the host
    /// animation system.
    Host,
    /// The engine schedules the cues itself: the window opens
    /// `windup_secs` after the windup starts and closes `window_secs` later.
    Scripted { windup_secs: f64, window_secs: f64 },
}

impl Default for CueSource {
    fn default() -> Self {
        CueSource::Scripted {
            windup_secs: 0.5,
            window_secs: 0.4,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every tuning value for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weapon.validate()?;
        self.combatant.validate()?;
        self.spawner.validate()?;
        self.player.validate()?;

        for placement in &self.pickups {
            if let Pickup::Health { amount } = placement.pickup {
                non_negative("pickups.amount", amount)?;
            }
        }

        if let CueSource::Scripted {
            windup_secs,
            window_secs,
        } = self.attack_cues
        {
            non_negative_secs("attack_cues.windup_secs", windup_secs)?;
            non_negative_secs("attack_cues.window_secs", window_secs)?;
        }
        Ok(())
    }
}

impl WeaponConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.magazine_capacity == 0 {
            return Err(ConfigError::invalid(
                "weapon.magazine_capacity",
                "must hold at least one round",
            ));
        }
        non_negative("weapon.damage", self.damage)?;
        positive("weapon.fire_distance", self.fire_distance)?;
        non_negative_secs("weapon.time_between_shots", self.time_between_shots)?;
        non_negative_secs("weapon.reload_time", self.reload_time)?;
        non_negative("weapon.max_spread", self.max_spread)?;
        positive("weapon.stability", self.stability)?;
        positive(
            "weapon.restore_from_recoil_speed",
            self.restore_from_recoil_speed,
        )
    }
}

impl CombatantConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("combatant.starting_health", self.starting_health)?;
        non_negative("combatant.damage", self.damage)?;
        non_negative("combatant.run_speed", self.run_speed)?;
        non_negative("combatant.patrol_speed", self.patrol_speed)?;
        non_negative("combatant.attack_radius", self.attack_radius)?;
        non_negative("combatant.attack_reach", self.attack_reach)?;
        non_negative("combatant.view_distance", self.view_distance)?;
        positive("combatant.turn_smooth_time", self.turn_smooth_time)?;
        positive("combatant.collider_radius", self.collider_radius)?;
        if !(self.field_of_view > 0.0 && self.field_of_view <= 360.0) {
            return Err(ConfigError::invalid(
                "combatant.field_of_view",
                format!("must be in (0, 360], got {}", self.field_of_view),
            ));
        }
        Ok(())
    }
}

impl SpawnerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ordered_range("spawner.health", self.health_min, self.health_max)?;
        ordered_range("spawner.damage", self.damage_min, self.damage_max)?;
        ordered_range("spawner.speed", self.speed_min, self.speed_max)?;
        positive("spawner.health_min", self.health_min)?;
        non_negative("spawner.damage_min", self.damage_min)?;
        non_negative("spawner.speed_min", self.speed_min)?;
        if self.enabled && self.spawn_points.is_empty() {
            return Err(ConfigError::invalid(
                "spawner.spawn_points",
                "an enabled spawner needs at least one spawn point",
            ));
        }
        Ok(())
    }
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("player.starting_health", self.starting_health)?;
        non_negative("player.speed", self.speed)?;
        positive("player.speed_smooth_time", self.speed_smooth_time)?;
        positive("player.turn_smooth_time", self.turn_smooth_time)?;
        positive("player.collider_radius", self.collider_radius)?;
        non_negative("player.pickup_reach", self.pickup_reach)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be non-negative, got {value}"),
        ))
    }
}

fn non_negative_secs(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a non-negative duration, got {value}"),
        ))
    }
}

fn ordered_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("minimum {min} exceeds maximum {max}"),
        ))
    }
}
