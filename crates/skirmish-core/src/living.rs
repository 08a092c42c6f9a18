//! Health pools and the damage protocol.
//!
//! Weapon hits and melee hits both go through [`Damageable`]; anything
//! that implements it is a valid hit target regardless of what kind of
//! entity it is.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::Health;
use crate::types::EntityId;

/// A single instance of damage. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageMessage {
    amount: f32,
    source: Option<EntityId>,
    hit_point: Vec3,
    hit_normal: Vec3,
}

impl DamageMessage {
    /// Negative and non-finite amounts are treated as zero.
    pub fn new(amount: f32, source: Option<EntityId>, hit_point: Vec3, hit_normal: Vec3) -> Self {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        Self {
            amount,
            source,
            hit_point,
            hit_normal: hit_normal.normalize_or_zero(),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Entity that caused the damage.
    pub fn source(&self) -> Option<EntityId> {
        self.source
    }

    pub fn hit_point(&self) -> Vec3 {
        self.hit_point
    }

    pub fn hit_normal(&self) -> Vec3 {
        self.hit_normal
    }
}

/// Capability to receive weapon and melee damage.
pub trait Damageable {
    /// Apply a damage message. Returns false, without any mutation, when
    /// the receiver is already dead.
    fn apply_damage(&mut self, message: &DamageMessage) -> bool;

    fn is_dead(&self) -> bool;
}

impl Health {
    pub fn new(starting: f32) -> Self {
        let starting = starting.max(0.0);
        Self {
            starting,
            current: starting,
            is_dead: starting <= 0.0,
        }
    }

    /// Heal by `amount`, clamped to the starting health. No effect once dead.
    pub fn restore(&mut self, amount: f32) {
        if self.is_dead || amount.is_nan() || amount <= 0.0 {
            return;
        }
        self.current = (self.current + amount).min(self.starting);
    }

    /// Transition to dead. Returns true only for the call that performed
    /// the transition; later calls change nothing.
    pub fn die(&mut self) -> bool {
        if self.is_dead {
            return false;
        }
        self.current = 0.0;
        self.is_dead = true;
        true
    }

    /// Fraction of starting health remaining (0.0 - 1.0).
    pub fn fraction(&self) -> f32 {
        if self.starting <= 0.0 {
            return 0.0;
        }
        self.current / self.starting
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, message: &DamageMessage) -> bool {
        if self.is_dead {
            return false;
        }

        self.current = (self.current - message.amount()).max(0.0);
        if self.current <= 0.0 {
            self.die();
        }
        true
    }

    fn is_dead(&self) -> bool {
        self.is_dead
    }
}
