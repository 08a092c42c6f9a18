//! Per-tick output collected by the systems.

use hecs::Entity;
use skirmish_core::events::SimEvent;
use skirmish_core::types::EntityId;

/// A death transition waiting for the engine to resolve its consequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub entity: Entity,
    pub killer: Option<EntityId>,
}

#[derive(Debug, Default)]
pub struct Outbox {
    /// Events handed to the host with the next snapshot.
    pub events: Vec<SimEvent>,
    /// Deaths not yet resolved, in the order they happened.
    pub deaths: Vec<Death>,
}

impl Outbox {
    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}
