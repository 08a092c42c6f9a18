//! Game state snapshot: the complete visible state handed to the host
//! after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::{Pickup, Tracer};
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{EntityId, SimTime, Tint};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave: u32,
    pub live_combatants: u32,
    pub score: ScoreView,
    pub player: Option<PlayerView>,
    pub combatants: Vec<CombatantView>,
    pub pickups: Vec<PickupView>,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub kills: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: EntityId,
    pub position: Vec3,
    pub yaw: f32,
    pub health: f32,
    pub starting_health: f32,
    pub dead: bool,
    pub weapon: Option<WeaponView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub mode: WeaponMode,
    pub mag_ammo: u32,
    pub magazine_capacity: u32,
    pub reserve_ammo: u32,
    pub spread: f32,
    pub enabled: bool,
    pub tracer: Option<Tracer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantView {
    pub id: EntityId,
    pub position: Vec3,
    pub yaw: f32,
    pub mode: CombatantMode,
    pub target: Option<EntityId>,
    pub health: f32,
    pub dead: bool,
    pub speed: f32,
    pub tint: Tint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub id: EntityId,
    pub position: Vec3,
    pub pickup: Pickup,
}
