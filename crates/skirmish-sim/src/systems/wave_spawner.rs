//! Wave spawning system: a new, larger wave every time the previous one
//! is wiped out.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_ai::profiles::roll_profile;
use skirmish_core::config::{CombatantConfig, SpawnPoint, SpawnerConfig};
use skirmish_core::constants::{ALL_NAV_AREAS, COMBATANTS_PER_WAVE};
use skirmish_core::events::SimEvent;
use skirmish_core::services::Navigation;

use crate::ids::entity_id;
use crate::outbox::Outbox;
use crate::world_setup;

/// How far from a spawn point a combatant may be placed to land on the
/// navigable floor.
const SPAWN_SNAP_RADIUS: f32 = 2.0;

/// Wave counter and the combatants of the current wave still alive.
#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    pub wave: u32,
    /// Living spawned combatants, in spawn order.
    pub live: Vec<Entity>,
}

impl SpawnDirector {
    /// Forget a combatant. Returns false if it was not part of a wave.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(index) = self.live.iter().position(|&e| e == entity) else {
            return false;
        };
        self.live.remove(index);
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    pub fn live_count(&self) -> u32 {
        self.live.len() as u32
    }
}

/// Spawn the next wave if the current one is gone.
pub fn run(
    world: &mut World,
    navigation: &dyn Navigation,
    rng: &mut ChaCha8Rng,
    director: &mut SpawnDirector,
    spawner: &SpawnerConfig,
    base: &CombatantConfig,
    outbox: &mut Outbox,
) {
    if !spawner.enabled || !director.live.is_empty() || spawner.spawn_points.is_empty() {
        return;
    }

    director.wave += 1;
    let count = director.wave * COMBATANTS_PER_WAVE;

    for _ in 0..count {
        let profile = roll_profile(rng, spawner);
        let point = spawner.spawn_points[rng.gen_range(0..spawner.spawn_points.len())];
        let position = resolve_spawn_point(navigation, &point);

        let entity = world_setup::spawn_combatant(
            world,
            position,
            point.yaw,
            profile.apply_to(base),
            profile.tint,
        );
        log::trace!(
            "spawned {:?} at {} (intensity {:.2})",
            entity_id(entity),
            position,
            profile.intensity
        );
        director.live.push(entity);
    }

    log::info!("wave {} started with {} combatants", director.wave, count);
    outbox.emit(SimEvent::WaveStarted {
        wave: director.wave,
        count,
    });
}

fn resolve_spawn_point(navigation: &dyn Navigation, point: &SpawnPoint) -> glam::Vec3 {
    match navigation.nearest_navigable_point(point.position, SPAWN_SNAP_RADIUS, ALL_NAV_AREAS) {
        Some(position) => position,
        None => {
            log::warn!(
                "spawn point {} is off the navigable floor; spawning there anyway",
                point.position
            );
            point.position
        }
    }
}
