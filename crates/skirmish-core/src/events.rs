//! Events emitted by the simulation for effects, audio, UI and scoring.
//!
//! Events are collected during a tick and handed out with the snapshot.
//! They are notifications only; nothing in the core reads them back.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::CombatantMode;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A damage message took effect.
    Damaged {
        target: EntityId,
        source: Option<EntityId>,
        amount: f32,
        hit_point: Vec3,
        hit_normal: Vec3,
        remaining: f32,
    },
    /// A living entity died. Emitted exactly once per entity.
    Died {
        entity: EntityId,
        killer: Option<EntityId>,
    },
    ScoreAwarded { amount: u32, total: u32 },
    /// A shot was fired; `to` is the impact point or the end of the ray.
    ShotFired {
        shooter: EntityId,
        from: Vec3,
        to: Vec3,
        hit: Option<EntityId>,
    },
    /// A shot struck something that cannot take damage.
    Impact { point: Vec3, normal: Vec3 },
    ReloadStarted { shooter: EntityId },
    ReloadCompleted { shooter: EntityId, transferred: u32 },
    /// A combatant changed behaviour state.
    ModeChanged {
        combatant: EntityId,
        from: CombatantMode,
        to: CombatantMode,
    },
    /// A combatant started its attack animation.
    AttackWindup { combatant: EntityId },
    WaveStarted { wave: u32, count: u32 },
    PickupUsed {
        pickup: EntityId,
        user: EntityId,
        /// False when the user had nothing the pickup could refill.
        applied: bool,
    },
    CorpseRemoved { entity: EntityId },
    GameOver,
}
