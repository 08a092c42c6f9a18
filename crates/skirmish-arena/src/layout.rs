//! ArenaLayout: floor extent and static pillars, loaded from JSON.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("failed to read arena: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse arena: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid arena: {0}")]
    Invalid(String),
}

/// Vertical cylinder of level geometry, unbounded in height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    /// Centre on the ground plane (world x, world z).
    pub center: Vec2,
    pub radius: f32,
}

impl Pillar {
    /// True if the ground-plane point lies inside the pillar grown by
    /// `clearance`.
    pub fn contains(&self, point: Vec2, clearance: f32) -> bool {
        point.distance_squared(self.center) < (self.radius + clearance).powi(2)
    }
}

/// Square arena centred on the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// Half the side length of the floor.
    pub half_extent: f32,
    /// Height of the body centre of anything standing on the floor.
    pub floor_height: f32,
    pub pillars: Vec<Pillar>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            floor_height: 0.0,
            pillars: Vec::new(),
        }
    }
}

impl ArenaLayout {
    pub fn from_json_str(json: &str) -> Result<Self, ArenaError> {
        let layout: ArenaLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read, parse and validate a JSON arena file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let layout = Self::from_json_str(&text)?;
        log::debug!(
            "loaded arena {}: half extent {}, {} pillars",
            path.display(),
            layout.half_extent,
            layout.pillars.len()
        );
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        if !(self.half_extent > 0.0 && self.half_extent.is_finite()) {
            return Err(ArenaError::Invalid(format!(
                "half_extent must be positive, got {}",
                self.half_extent
            )));
        }
        for (i, pillar) in self.pillars.iter().enumerate() {
            if !(pillar.radius > 0.0 && pillar.radius.is_finite()) {
                return Err(ArenaError::Invalid(format!(
                    "pillar {i} has radius {}",
                    pillar.radius
                )));
            }
        }
        Ok(())
    }

    /// True if the ground-plane point is on the floor, `margin` inside the edge.
    pub fn in_bounds(&self, point: Vec2, margin: f32) -> bool {
        let limit = self.half_extent - margin;
        point.x.abs() <= limit && point.y.abs() <= limit
    }

    /// Clamp a ground-plane point onto the floor, `margin` inside the edge.
    pub fn clamp_to_floor(&self, point: Vec2, margin: f32) -> Vec2 {
        let limit = (self.half_extent - margin).max(0.0);
        point.clamp(Vec2::splat(-limit), Vec2::splat(limit))
    }

    /// Lift a ground-plane point to a world position on the floor.
    pub fn to_world(&self, point: Vec2) -> Vec3 {
        Vec3::new(point.x, self.floor_height, point.y)
    }
}

/// Ground-plane projection of a world position.
pub fn ground(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}
