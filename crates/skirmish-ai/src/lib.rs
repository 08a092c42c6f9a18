//! Combatant AI for Skirmish.
//!
//! Implements the combatant behaviour state machine, view-cone and
//! line-of-sight perception, and the intensity-driven spawn profiles.

pub mod fsm;
pub mod perception;
pub mod profiles;

pub use skirmish_core as core;

#[cfg(test)]
mod tests;
