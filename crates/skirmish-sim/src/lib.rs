//! Simulation engine for Skirmish.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the host.

pub mod engine;
pub mod ids;
pub mod outbox;
pub mod scoring;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use skirmish_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
