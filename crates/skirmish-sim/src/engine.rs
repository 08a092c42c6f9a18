//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Geometry comes only
//! from the injected spatial and navigation services, so the engine runs
//! headless and deterministically.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish_ai::profiles::profile_for_intensity;
use skirmish_arena::{ArenaLayout, ArenaNavigation, ArenaPhysics};
use skirmish_core::commands::PlayerCommand;
use skirmish_core::components::{Collider, Combatant, NavAgent, Pickup, PlayerMotion, Weapon};
use skirmish_core::config::SimConfig;
use skirmish_core::constants::{CORPSE_CLEANUP_SECS, PERCEPTION_INTERVAL_SECS};
use skirmish_core::enums::{AttackCue, CombatantMode, GamePhase};
use skirmish_core::error::ConfigError;
use skirmish_core::events::SimEvent;
use skirmish_core::living::DamageMessage;
use skirmish_core::services::{Navigation, SpatialQuery};
use skirmish_core::state::{GameStateSnapshot, ScoreView};
use skirmish_core::types::{EntityId, SimTime};

use crate::ids::{entity_id, resolve};
use crate::outbox::{Death, Outbox};
use crate::scoring::ScoreState;
use crate::systems;
use crate::systems::combatant::CueClock;
use crate::systems::wave_spawner::SpawnDirector;
use crate::timers::{TaskKind, TimerQueue};
use crate::world_setup;

/// Slack when deciding whether the perception tick is due.
const PERCEPTION_EPSILON: f64 = 1.0e-9;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    physics: Box<dyn SpatialQuery>,
    navigation: Box<dyn Navigation>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    timers: TimerQueue,
    outbox: Outbox,
    director: SpawnDirector,
    score: ScoreState,
    player: Entity,
    next_perception_secs: f64,
}

impl SimulationEngine {
    /// Create a new simulation against host-provided spatial and navigation
    /// services. Spawns the player and the configured pickups.
    pub fn new(
        config: SimConfig,
        physics: Box<dyn SpatialQuery>,
        navigation: Box<dyn Navigation>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let player = world_setup::spawn_player(&mut world, &config.player, &config.weapon);
        for placement in &config.pickups {
            world_setup::spawn_pickup(&mut world, placement.pickup, placement.position);
        }

        let mut engine = Self {
            world,
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            physics,
            navigation,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            timers: TimerQueue::default(),
            outbox: Outbox::default(),
            director: SpawnDirector::default(),
            score: ScoreState::default(),
            player,
            next_perception_secs: 0.0,
            config,
        };
        systems::colliders::run(&engine.world, &mut *engine.physics);

        log::info!(
            "simulation ready (seed {}, {} pickups)",
            engine.config.seed,
            engine.config.pickups.len()
        );
        Ok(engine)
    }

    /// Create a simulation running against the built-in arena services.
    pub fn headless(config: SimConfig, layout: ArenaLayout) -> Result<Self, ConfigError> {
        let agent_radius = config.combatant.collider_radius;
        let physics = ArenaPhysics::new(layout.clone());
        let navigation = ArenaNavigation::new(layout, agent_radius);
        Self::new(config, Box::new(physics), Box::new(navigation))
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase != GamePhase::Paused {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.outbox.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.director,
            &self.score,
            events,
        )
    }

    // --- Accessors ---

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn wave(&self) -> u32 {
        self.director.wave
    }

    pub fn score(&self) -> ScoreView {
        self.score.view()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> EntityId {
        entity_id(self.player)
    }

    /// Living combatants of the current wave, in spawn order.
    pub fn live_combatants(&self) -> Vec<EntityId> {
        self.director.live.iter().copied().map(entity_id).collect()
    }

    /// Resolve an id to its ECS entity, if it still exists.
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        resolve(&self.world, id)
    }

    /// Timed continuations pending for `id`, in scheduling order.
    pub fn pending_tasks(&self, id: EntityId) -> Vec<TaskKind> {
        self.entity(id)
            .map(|entity| self.timers.pending_for(entity))
            .unwrap_or_default()
    }

    // --- Operations ---
    //
    // Each returns false (or None) when rejected, leaving the simulation
    // unchanged. Deaths caused by an operation are resolved before it
    // returns.

    /// Fire `shooter`'s weapon toward `aim_target`.
    pub fn fire(&mut self, shooter: EntityId, aim_target: Vec3) -> bool {
        let Some(shooter) = self.entity(shooter) else {
            return false;
        };
        let clock = self.clock();
        let fired = systems::weapon::fire(
            &self.world,
            &*self.physics,
            &mut self.rng,
            &mut self.timers,
            &mut self.outbox,
            clock,
            shooter,
            aim_target,
        );
        if fired {
            log::trace!("{:?} fired toward {}", entity_id(shooter), aim_target);
        }
        self.resolve_deaths();
        fired
    }

    pub fn reload(&mut self, shooter: EntityId) -> bool {
        let Some(shooter) = self.entity(shooter) else {
            return false;
        };
        let started = systems::weapon::reload(
            &self.world,
            &mut self.timers,
            &mut self.outbox,
            shooter,
            self.time.elapsed_secs,
        );
        if started {
            log::debug!("{:?} reloading", entity_id(shooter));
        }
        started
    }

    /// Equip (true) or holster (false) a weapon.
    pub fn set_weapon_enabled(&mut self, shooter: EntityId, enabled: bool) -> bool {
        let Some(shooter) = self.entity(shooter) else {
            return false;
        };
        systems::weapon::set_enabled(&self.world, &mut self.timers, shooter, enabled)
    }

    /// Apply a damage message to any living entity.
    pub fn apply_damage(&mut self, target: EntityId, message: DamageMessage) -> bool {
        let Some(target) = self.entity(target) else {
            return false;
        };
        let clock = self.clock();
        let applied = systems::damage::apply(
            &self.world,
            &mut self.timers,
            &mut self.outbox,
            clock,
            target,
            &message,
        );
        self.resolve_deaths();
        applied
    }

    pub fn restore_health(&mut self, entity: EntityId, amount: f32) -> bool {
        self.entity(entity)
            .is_some_and(|entity| systems::damage::restore(&self.world, entity, amount))
    }

    /// Kill a living entity outright. True only for the call that killed it.
    pub fn kill(&mut self, entity: EntityId) -> bool {
        let Some(entity) = self.entity(entity) else {
            return false;
        };
        let killed = systems::damage::kill(&self.world, &mut self.outbox, entity);
        self.resolve_deaths();
        killed
    }

    /// `user` consumes `pickup`.
    pub fn use_pickup(&mut self, pickup: EntityId, user: EntityId) -> bool {
        let (Some(pickup), Some(user)) = (self.entity(pickup), self.entity(user)) else {
            return false;
        };
        systems::pickups::use_pickup(
            &mut self.world,
            &mut *self.physics,
            &mut self.outbox,
            &mut self.despawn_buffer,
            pickup,
            user,
        )
    }

    /// Deliver an attack animation cue to a combatant.
    pub fn attack_cue(&mut self, combatant: EntityId, cue: AttackCue) -> bool {
        let Some(combatant) = self.entity(combatant) else {
            return false;
        };
        let clock = self.clock();
        systems::combatant::handle_cue(
            &self.world,
            &mut self.timers,
            &mut self.outbox,
            clock,
            combatant,
            cue,
        )
    }

    /// Place a pickup in the world.
    pub fn spawn_pickup(&mut self, pickup: Pickup, position: Vec3) -> EntityId {
        let entity = world_setup::spawn_pickup(&mut self.world, pickup, position);
        systems::colliders::run(&self.world, &mut *self.physics);
        entity_id(entity)
    }

    /// Add a combatant of the given intensity to the current wave.
    pub fn spawn_combatant(&mut self, position: Vec3, yaw: f32, intensity: f32) -> EntityId {
        let profile = profile_for_intensity(intensity, &self.config.spawner);
        let entity = world_setup::spawn_combatant(
            &mut self.world,
            position,
            yaw,
            profile.apply_to(&self.config.combatant),
            profile.tint,
        );
        self.director.live.push(entity);
        systems::colliders::run(&self.world, &mut *self.physics);
        entity_id(entity)
    }

    // --- Tick internals ---

    fn clock(&self) -> CueClock {
        CueClock {
            cues: self.config.attack_cues,
            now: self.time.elapsed_secs,
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        let player = self.player();
        match command {
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            command if self.phase == GamePhase::Paused => {
                log::debug!("ignoring {:?} while paused", command);
            }
            PlayerCommand::Fire { aim_target } => {
                self.fire(player, aim_target);
            }
            PlayerCommand::Reload => {
                self.reload(player);
            }
            PlayerCommand::SetWeaponEnabled { enabled } => {
                self.set_weapon_enabled(player, enabled);
            }
            PlayerCommand::Move { input } => {
                if let Ok(mut motion) = self.world.get::<&mut PlayerMotion>(self.player) {
                    motion.move_input = clamp_input(input);
                }
            }
            PlayerCommand::Face { yaw } => {
                if let Ok(mut motion) = self.world.get::<&mut PlayerMotion>(self.player) {
                    motion.target_yaw = yaw.is_finite().then_some(yaw);
                }
            }
            PlayerCommand::UsePickup { pickup } => {
                self.use_pickup(pickup, player);
            }
            PlayerCommand::AttackCue { combatant, cue } => {
                self.attack_cue(combatant, cue);
            }
            PlayerCommand::Kill { entity } => {
                self.kill(entity);
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let clock = self.clock();

        // 1. Timed continuations
        self.run_timers(clock);
        self.resolve_deaths();

        // 2. Wave spawning
        if self.phase == GamePhase::Active {
            systems::wave_spawner::run(
                &mut self.world,
                &*self.navigation,
                &mut self.rng,
                &mut self.director,
                &self.config.spawner,
                &self.config.combatant,
                &mut self.outbox,
            );
        }

        // 3. Perception phase (low rate)
        if clock.now + PERCEPTION_EPSILON >= self.next_perception_secs {
            systems::perception::run(
                &self.world,
                &*self.physics,
                &*self.navigation,
                &mut self.rng,
                &mut self.timers,
                &mut self.outbox,
                clock,
            );
            self.next_perception_secs += PERCEPTION_INTERVAL_SECS;
        }

        // 4. Frame phase
        systems::combatant::run_frame(&self.world, &mut self.timers, &mut self.outbox, clock);
        systems::player_motion::run(
            &mut self.world,
            &*self.navigation,
            &self.config.player,
        );
        systems::navigation::run(&mut self.world, &*self.navigation);
        systems::colliders::run(&self.world, &mut *self.physics);
        systems::melee::run(
            &self.world,
            &*self.physics,
            &mut self.timers,
            &mut self.outbox,
            clock,
        );
        systems::weapon::decay_recoil(&mut self.world);
        systems::pickups::auto_use(
            &mut self.world,
            &mut *self.physics,
            &mut self.outbox,
            &mut self.despawn_buffer,
            self.config.player.pickup_reach,
        );

        // 5. Deaths and cleanup
        self.resolve_deaths();
        systems::cleanup::run(
            &mut self.world,
            &mut *self.physics,
            &mut self.despawn_buffer,
        );
    }

    fn run_timers(&mut self, clock: CueClock) {
        for task in self.timers.pop_due(clock.now) {
            if !self.world.contains(task.owner) {
                continue;
            }
            match task.kind {
                TaskKind::ReloadComplete => {
                    systems::weapon::complete_reload(&self.world, &mut self.outbox, task.owner);
                    log::debug!("{:?} reload complete", entity_id(task.owner));
                }
                TaskKind::TracerEnd => systems::weapon::end_tracer(&self.world, task.owner),
                TaskKind::AttackCue(cue) => {
                    systems::combatant::handle_cue(
                        &self.world,
                        &mut self.timers,
                        &mut self.outbox,
                        clock,
                        task.owner,
                        cue,
                    );
                }
                TaskKind::RemoveCorpse => {
                    self.despawn_buffer.push(task.owner);
                    self.outbox.emit(SimEvent::CorpseRemoved {
                        entity: entity_id(task.owner),
                    });
                }
            }
        }
    }

    /// Resolve queued deaths, including any a resolution itself causes.
    fn resolve_deaths(&mut self) {
        while !self.outbox.deaths.is_empty() {
            let deaths = std::mem::take(&mut self.outbox.deaths);
            for death in deaths {
                self.resolve_death(death);
            }
        }
    }

    fn resolve_death(&mut self, death: Death) {
        let Death { entity, killer } = death;
        let id = entity_id(entity);
        self.outbox.emit(SimEvent::Died { entity: id, killer });
        self.timers.cancel_owner(entity);

        if let Ok(mut agent) = self.world.get::<&mut NavAgent>(entity) {
            agent.enabled = false;
            agent.stopped = true;
            agent.velocity = Vec3::ZERO;
            agent.destination = None;
            agent.path.clear();
        }
        if let Ok(mut combatant) = self.world.get::<&mut Combatant>(entity) {
            combatant.target = None;
            combatant.recent_hits.clear();
            combatant.mode = CombatantMode::Patrol;
        }
        if let Ok(mut weapon) = self.world.get::<&mut Weapon>(entity) {
            weapon.tracer = None;
        }
        if let Ok(mut collider) = self.world.get::<&mut Collider>(entity) {
            collider.enabled = false;
        }
        self.physics.remove_collider(id);

        if self.director.remove(entity) {
            log::debug!("combatant {:?} killed by {:?}", id, killer);
            self.timers.schedule(
                entity,
                self.time.elapsed_secs + CORPSE_CLEANUP_SECS,
                TaskKind::RemoveCorpse,
            );
            let award = self.score.award_kill();
            self.outbox.emit(award);
        }

        if entity == self.player && self.phase != GamePhase::GameOver {
            log::info!(
                "player died at {:.2}s; game over (wave {}, score {})",
                self.time.elapsed_secs,
                self.director.wave,
                self.score.score
            );
            self.phase = GamePhase::GameOver;
            self.outbox.emit(SimEvent::GameOver);
        }
    }
}

/// Movement input longer than one is scaled back to unit length.
fn clamp_input(input: Vec2) -> Vec2 {
    if input.is_finite() {
        input.clamp_length_max(1.0)
    } else {
        Vec2::ZERO
    }
}
