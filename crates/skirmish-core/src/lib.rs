//! Core types and definitions for the Skirmish combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, constants, tuning
//! configuration and the contracts of the host-provided services.
//! It has no dependency on any runtime or ECS.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod living;
pub mod math;
pub mod services;
pub mod state;
pub mod types;

pub use glam;
