//! Arena collaborators for Skirmish.
//!
//! A flat square floor with cylindrical pillars, plus the spatial query
//! and navigation services the simulation runs against when no host
//! engine provides them. The floor edge bounds navigation only; rays and
//! sweeps that leave it hit nothing.

pub use skirmish_core as core;

pub mod geometry;
pub mod layout;
pub mod los;
pub mod navigation;
pub mod physics;

// Re-export key types for convenience.
pub use layout::{ArenaError, ArenaLayout, Pillar};
pub use los::has_line_of_sight;
pub use navigation::ArenaNavigation;
pub use physics::ArenaPhysics;
