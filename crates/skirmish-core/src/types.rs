//! Fundamental geometric and simulation types.

use std::ops::{BitAnd, BitOr, Not};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque reference to a simulated entity.
///
/// The simulation maps these to and from its ECS handles; collaborators
/// (physics, navigation, host) only ever see the opaque value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT as f64
    }

    /// Advance by one tick. Elapsed time is derived from the tick count
    /// so it never accumulates rounding drift.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * self.dt();
    }
}

/// Bit set of collision layers used to filter spatial queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Static level geometry (walls, pillars).
    pub const ENVIRONMENT: LayerMask = LayerMask(1 << 0);
    pub const PLAYER: LayerMask = LayerMask(1 << 1);
    pub const COMBATANT: LayerMask = LayerMask(1 << 2);
    pub const PICKUP: LayerMask = LayerMask(1 << 3);

    /// True if any bit of `other` is set in `self`.
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = LayerMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 & rhs.0)
    }
}

impl Not for LayerMask {
    type Output = LayerMask;

    fn not(self) -> Self::Output {
        LayerMask(!self.0)
    }
}

/// Result of a raycast or sweep against the spatial service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Entity owning the collider, `None` for static level geometry.
    pub entity: Option<EntityId>,
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance travelled along the query direction. Zero for shapes that
    /// already overlapped at the start of a sweep.
    pub distance: f32,
}

/// Linear RGB tint applied to combatant skins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint(pub [f32; 3]);

impl Tint {
    pub const WHITE: Tint = Tint([1.0, 1.0, 1.0]);
    pub const RED: Tint = Tint([1.0, 0.0, 0.0]);

    /// Interpolate toward `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Tint, t: f32) -> Tint {
        let t = t.clamp(0.0, 1.0);
        let [r0, g0, b0] = self.0;
        let [r1, g1, b1] = other.0;
        Tint([
            r0 + (r1 - r0) * t,
            g0 + (g1 - g0) * t,
            b0 + (b1 - b0) * t,
        ])
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

/// Unit facing vector on the ground plane for a yaw in degrees
/// (0 = +Z, clockwise toward +X when seen from above).
pub fn forward_from_yaw(yaw_deg: f32) -> Vec3 {
    let yaw = yaw_deg.to_radians();
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw in degrees that faces along `direction` on the ground plane.
/// Returns `None` for directions with no horizontal component.
pub fn yaw_towards(direction: Vec3) -> Option<f32> {
    if direction.x.abs() < f32::EPSILON && direction.z.abs() < f32::EPSILON {
        return None;
    }
    Some(direction.x.atan2(direction.z).to_degrees())
}
