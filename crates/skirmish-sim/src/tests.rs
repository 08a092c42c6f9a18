//! Tests for the simulation engine: weapon bookkeeping, damage and death,
//! combatant behaviour, waves, pickups and determinism.

use glam::{Vec2, Vec3};

use skirmish_ai::fsm::is_legal;
use skirmish_arena::{ArenaLayout, Pillar};
use skirmish_core::commands::PlayerCommand;
use skirmish_core::components::{Combatant, Health, Pickup, Transform, Weapon};
use skirmish_core::config::{CueSource, SimConfig, SpawnerConfig};
use skirmish_core::enums::*;
use skirmish_core::error::ConfigError;
use skirmish_core::events::SimEvent;
use skirmish_core::living::DamageMessage;
use skirmish_core::types::EntityId;

use crate::engine::SimulationEngine;
use crate::timers::TaskKind;

/// Ticks comfortably longer than the time between shots.
const SHOT_GAP_TICKS: usize = 8;

fn quiet_config() -> SimConfig {
    SimConfig {
        spawner: SpawnerConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn make_engine(config: SimConfig) -> SimulationEngine {
    SimulationEngine::headless(config, ArenaLayout::default()).unwrap()
}

/// Run `n` ticks and collect every event they produced.
fn run_ticks(engine: &mut SimulationEngine, n: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(engine.tick().events);
    }
    events
}

fn weapon(engine: &SimulationEngine) -> Weapon {
    let player = engine.entity(engine.player()).unwrap();
    let weapon = engine.world().get::<&Weapon>(player).unwrap();
    (*weapon).clone()
}

fn health(engine: &SimulationEngine, id: EntityId) -> Health {
    let entity = engine.entity(id).unwrap();
    *engine.world().get::<&Health>(entity).unwrap()
}

fn combatant(engine: &SimulationEngine, id: EntityId) -> Combatant {
    let entity = engine.entity(id).unwrap();
    let combatant = engine.world().get::<&Combatant>(entity).unwrap();
    (*combatant).clone()
}

/// Put `id` at `position` facing `yaw`, as a host teleport would.
fn place(engine: &SimulationEngine, id: EntityId, position: Vec3, yaw: f32) {
    let entity = engine.entity(id).unwrap();
    let mut transform = engine.world().get::<&mut Transform>(entity).unwrap();
    transform.position = position;
    transform.yaw = yaw;
}

fn hit(amount: f32, source: Option<EntityId>) -> DamageMessage {
    DamageMessage::new(amount, source, Vec3::ZERO, Vec3::Y)
}

fn count_died(events: &[SimEvent], id: EntityId) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::Died { entity, .. } if *entity == id))
        .count()
}

/// Far down +Z, clear of anything in the default arena.
const EMPTY_AIM: Vec3 = Vec3::new(0.0, 0.4, 50.0);

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = make_engine(config.clone());
    let mut engine_b = make_engine(config);

    for i in 0..600 {
        if i % 10 == 0 {
            let command = PlayerCommand::Fire {
                aim_target: Vec3::new(15.0, 0.0, 15.0),
            };
            engine_a.queue_command(command.clone());
            engine_b.queue_command(command);
        }
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed at tick {i}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = make_engine(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = make_engine(SimConfig {
        seed: 222,
        ..Default::default()
    });

    let mut diverged = false;
    for _ in 0..120 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent waves");
}

// ---- Configuration ----

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = quiet_config();
    config.weapon.magazine_capacity = 0;
    let result = SimulationEngine::headless(config, ArenaLayout::default());
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "weapon.magazine_capacity",
            ..
        })
    ));
}

// ---- Weapon ----

#[test]
fn test_fire_full_magazine_then_reload() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();

    for shot in 0..30 {
        assert!(engine.fire(player, EMPTY_AIM), "shot {shot} should fire");
        run_ticks(&mut engine, SHOT_GAP_TICKS);
    }

    let w = weapon(&engine);
    assert_eq!(w.mode, WeaponMode::Empty);
    assert_eq!(w.mag_ammo, 0);
    assert_eq!(w.reserve_ammo, 100);
    assert!(!engine.fire(player, EMPTY_AIM), "empty magazine must not fire");

    assert!(engine.reload(player));
    assert_eq!(weapon(&engine).mode, WeaponMode::Reloading);
    let events = run_ticks(&mut engine, 100);
    assert_eq!(weapon(&engine).mode, WeaponMode::Reloading, "reload takes 1.8 s");
    assert!(events.iter().all(|e| !matches!(e, SimEvent::ReloadCompleted { .. })));

    let events = run_ticks(&mut engine, 12);
    let w = weapon(&engine);
    assert_eq!(w.mode, WeaponMode::Ready);
    assert_eq!(w.mag_ammo, 30);
    assert_eq!(w.reserve_ammo, 70);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::ReloadCompleted { transferred: 30, .. })));
}

#[test]
fn test_partial_reload_is_limited_by_reserve() {
    let mut config = quiet_config();
    config.weapon.reserve_ammo = 4;
    let mut engine = make_engine(config);
    let player = engine.player();

    for _ in 0..10 {
        assert!(engine.fire(player, EMPTY_AIM));
        run_ticks(&mut engine, SHOT_GAP_TICKS);
    }
    assert!(engine.reload(player));
    run_ticks(&mut engine, 120);

    let w = weapon(&engine);
    assert_eq!(w.mag_ammo, 24);
    assert_eq!(w.reserve_ammo, 0);
    assert!(!engine.reload(player), "nothing left to reload");
}

#[test]
fn test_fire_and_reload_rejections() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();

    assert!(!engine.reload(player), "full magazine rejects reload");

    assert!(engine.fire(player, EMPTY_AIM));
    assert!(!engine.fire(player, EMPTY_AIM), "second shot within the cycle time");
    let before = weapon(&engine);

    assert!(engine.reload(player));
    assert!(!engine.reload(player), "already reloading");
    run_ticks(&mut engine, SHOT_GAP_TICKS);
    assert!(!engine.fire(player, EMPTY_AIM), "cannot fire while reloading");
    assert_eq!(weapon(&engine).mag_ammo, before.mag_ammo);

    assert!(!engine.fire(EntityId(u64::MAX), EMPTY_AIM), "unknown shooter");
}

#[test]
fn test_disabled_weapon_rejects_and_cancels_reload() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();

    assert!(engine.fire(player, EMPTY_AIM));
    run_ticks(&mut engine, SHOT_GAP_TICKS);
    assert!(engine.reload(player));
    assert!(engine
        .pending_tasks(player)
        .contains(&TaskKind::ReloadComplete));

    assert!(engine.set_weapon_enabled(player, false));
    assert!(!engine.set_weapon_enabled(player, false), "already holstered");
    assert!(engine.pending_tasks(player).is_empty());
    assert!(!engine.fire(player, EMPTY_AIM));

    let events = run_ticks(&mut engine, 150);
    assert!(
        events.iter().all(|e| !matches!(e, SimEvent::ReloadCompleted { .. })),
        "a cancelled reload must never complete"
    );

    assert!(engine.set_weapon_enabled(player, true));
    let w = weapon(&engine);
    assert_eq!(w.mode, WeaponMode::Ready);
    assert_eq!(w.mag_ammo, 30);
    assert_eq!(w.current_spread, 0.0);
    assert_eq!(w.last_fire_secs, None);
    assert!(engine.fire(player, EMPTY_AIM));
}

#[test]
fn test_spread_grows_is_bounded_and_decays() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();

    assert!(engine.fire(player, EMPTY_AIM));
    assert_eq!(weapon(&engine).current_spread, 1.0, "1 / stability per shot");

    let max_spread = engine.config().weapon.max_spread;
    let mut peak: f32 = 0.0;
    for _ in 0..25 {
        run_ticks(&mut engine, SHOT_GAP_TICKS);
        engine.fire(player, EMPTY_AIM);
        let spread = weapon(&engine).current_spread;
        assert!((0.0..=max_spread).contains(&spread), "spread {spread} out of range");
        peak = peak.max(spread);
    }
    assert!(peak > 1.0, "sustained fire should accumulate spread");

    run_ticks(&mut engine, 300);
    let spread = weapon(&engine).current_spread;
    assert!(spread < 0.01, "spread should settle, got {spread}");
}

#[test]
fn test_shot_damages_combatant_and_it_retaliates() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();
    // Facing away from the player, so it cannot see who shot it.
    let target = engine.spawn_combatant(Vec3::new(0.0, 0.0, 10.0), 0.0, 0.0);

    assert!(engine.fire(player, Vec3::new(0.0, 0.0, 10.0)));
    assert_eq!(health(&engine, target).current, 75.0);

    let c = combatant(&engine, target);
    assert_eq!(c.mode, CombatantMode::Tracking);
    assert_eq!(c.target, Some(player));

    let events = engine.tick().events;
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::ShotFired { hit: Some(id), .. } if *id == target
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::Damaged { target: id, amount, .. } if *id == target && *amount == 25.0
    )));
}

#[test]
fn test_shot_into_pillar_reports_impact() {
    let layout = ArenaLayout {
        pillars: vec![Pillar {
            center: Vec2::new(0.0, 5.0),
            radius: 1.0,
        }],
        ..Default::default()
    };
    let mut engine = SimulationEngine::headless(quiet_config(), layout).unwrap();
    let player = engine.player();
    let behind = engine.spawn_combatant(Vec3::new(0.0, 0.0, 10.0), 0.0, 0.0);

    assert!(engine.fire(player, Vec3::new(0.0, 0.0, 10.0)));
    assert_eq!(health(&engine, behind).current, 100.0, "pillar absorbs the shot");

    let events = engine.tick().events;
    assert!(events.iter().any(|e| matches!(e, SimEvent::Impact { .. })));
    assert!(events.iter().all(|e| !matches!(e, SimEvent::Damaged { .. })));
}

// ---- Damage & death ----

#[test]
fn test_lethal_damage_dies_exactly_once() {
    let mut engine = make_engine(quiet_config());
    let target = engine.spawn_combatant(Vec3::new(0.0, 0.0, 15.0), 0.0, 0.0);
    assert_eq!(health(&engine, target).current, 100.0);

    assert!(engine.apply_damage(target, hit(40.0, None)));
    assert_eq!(health(&engine, target).current, 60.0);

    assert!(engine.apply_damage(target, hit(70.0, None)));
    let h = health(&engine, target);
    assert_eq!(h.current, 0.0);
    assert!(h.is_dead);

    assert!(!engine.apply_damage(target, hit(10.0, None)), "dead bodies take no damage");
    assert!(!engine.kill(target), "already dead");
    assert!(!engine.restore_health(target, 50.0));
    assert_eq!(health(&engine, target).current, 0.0);

    let events = run_ticks(&mut engine, 5);
    assert_eq!(count_died(&events, target), 1);
    assert_eq!(engine.score().kills, 1);
    assert_eq!(engine.score().score, 100);
}

#[test]
fn test_damage_on_entity_without_health_is_rejected() {
    let mut engine = make_engine(quiet_config());
    let pickup = engine.spawn_pickup(Pickup::ammo_pack(), Vec3::new(5.0, 0.0, 5.0));
    assert!(!engine.apply_damage(pickup, hit(10.0, None)));
    assert!(!engine.kill(pickup));
    assert!(!engine.restore_health(pickup, 10.0));
}

#[test]
fn test_dead_combatant_stops_acting_and_corpse_is_removed() {
    let mut engine = make_engine(quiet_config());
    let doomed = engine.spawn_combatant(Vec3::new(0.0, 0.0, 5.0), 180.0, 0.0);
    run_ticks(&mut engine, 2);
    assert_eq!(combatant(&engine, doomed).mode, CombatantMode::Tracking);

    assert!(engine.kill(doomed));
    let position = engine
        .world()
        .get::<&Transform>(engine.entity(doomed).unwrap())
        .unwrap()
        .position;
    assert_eq!(engine.pending_tasks(doomed), vec![TaskKind::RemoveCorpse]);
    assert!(engine.live_combatants().is_empty());

    let events = run_ticks(&mut engine, 590);
    assert!(events.iter().all(|e| !matches!(
        e,
        SimEvent::ModeChanged { combatant: id, .. } | SimEvent::AttackWindup { combatant: id }
            if *id == doomed
    )));
    let corpse = engine.entity(doomed).expect("corpse stays for 10 s");
    assert_eq!(
        engine.world().get::<&Transform>(corpse).unwrap().position,
        position,
        "corpses do not move"
    );

    let events = run_ticks(&mut engine, 20);
    assert!(engine.entity(doomed).is_none());
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::CorpseRemoved { entity } if *entity == doomed)));
}

// ---- Combatant behaviour ----

#[test]
fn test_perception_respects_view_distance() {
    let mut near = make_engine(quiet_config());
    let close = near.spawn_combatant(Vec3::new(0.0, 0.0, 5.0), 180.0, 0.0);
    run_ticks(&mut near, 2);
    let c = combatant(&near, close);
    assert_eq!(c.mode, CombatantMode::Tracking);
    assert_eq!(c.target, Some(near.player()));

    let mut far = make_engine(quiet_config());
    let distant = far.spawn_combatant(Vec3::new(0.0, 0.0, 15.0), 180.0, 0.0);
    run_ticks(&mut far, 2);
    let c = combatant(&far, distant);
    assert_eq!(c.mode, CombatantMode::Patrol);
    assert_eq!(c.target, None);
}

#[test]
fn test_perception_notices_a_target_moved_into_range() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();
    let watcher = engine.spawn_combatant(Vec3::new(0.0, 0.0, 15.0), 180.0, 0.0);

    // Four perception passes out of range.
    for _ in 0..12 {
        place(&engine, watcher, Vec3::new(0.0, 0.0, 15.0), 180.0);
        engine.tick();
        let c = combatant(&engine, watcher);
        assert_eq!(c.mode, CombatantMode::Patrol);
        assert_eq!(c.target, None);
    }

    let mut ticks = 0;
    while combatant(&engine, watcher).mode == CombatantMode::Patrol {
        assert!(ticks < 3, "not noticed within one perception interval");
        place(&engine, watcher, Vec3::new(0.0, 0.0, 5.0), 180.0);
        engine.tick();
        ticks += 1;
    }
    let c = combatant(&engine, watcher);
    assert_eq!(c.mode, CombatantMode::Tracking);
    assert_eq!(c.target, Some(player));
}

#[test]
fn test_perception_respects_view_cone_and_cover() {
    let mut engine = make_engine(quiet_config());
    let facing_away = engine.spawn_combatant(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0);
    run_ticks(&mut engine, 2);
    assert_eq!(combatant(&engine, facing_away).mode, CombatantMode::Patrol);

    let layout = ArenaLayout {
        pillars: vec![Pillar {
            center: Vec2::new(0.0, 2.5),
            radius: 0.8,
        }],
        ..Default::default()
    };
    let mut engine = SimulationEngine::headless(quiet_config(), layout).unwrap();
    let behind_cover = engine.spawn_combatant(Vec3::new(0.0, 0.0, 5.0), 180.0, 0.0);
    engine.tick();
    assert_eq!(combatant(&engine, behind_cover).mode, CombatantMode::Patrol);
}

#[test]
fn test_full_fight_stays_on_the_transition_graph() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();
    let attacker = engine.spawn_combatant(Vec3::new(0.0, 0.0, 6.0), 180.0, 0.0);

    let mut saw_attack = false;
    let mut player_hits = 0;
    for _ in 0..900 {
        let snapshot = engine.tick();
        for event in &snapshot.events {
            match event {
                SimEvent::ModeChanged { from, to, .. } => {
                    assert!(is_legal(*from, *to), "illegal transition {from:?} -> {to:?}");
                    saw_attack |= *to == CombatantMode::Attacking;
                }
                SimEvent::Damaged { target, .. } if *target == player => player_hits += 1,
                _ => {}
            }
        }

        let c = combatant(&engine, attacker);
        if !health(&engine, attacker).is_dead {
            assert_eq!(
                c.target.is_some(),
                c.mode != CombatantMode::Patrol,
                "target held exactly outside patrol"
            );
        }
        if c.mode != CombatantMode::Attacking {
            assert!(c.recent_hits.is_empty(), "hits only recorded inside the window");
        }
    }

    assert!(saw_attack);
    // 20 damage a swing against 100 health.
    assert_eq!(player_hits, 5);
    assert!(health(&engine, player).is_dead);
    assert_eq!(engine.phase(), GamePhase::GameOver);
    let c = combatant(&engine, attacker);
    assert_eq!(c.mode, CombatantMode::Patrol, "dead target sends it back on patrol");
    assert_eq!(c.target, None);
}

#[test]
fn test_host_cues_drive_the_damage_window() {
    let config = SimConfig {
        attack_cues: CueSource::Host,
        ..quiet_config()
    };
    let mut engine = make_engine(config);
    let player = engine.player();
    let attacker = engine.spawn_combatant(Vec3::new(0.0, 0.0, 2.5), 180.0, 0.0);

    engine.tick();
    assert_eq!(combatant(&engine, attacker).mode, CombatantMode::AttackWindup);
    assert!(!engine.attack_cue(attacker, AttackCue::End), "window not open yet");

    run_ticks(&mut engine, 120);
    assert_eq!(
        combatant(&engine, attacker).mode,
        CombatantMode::AttackWindup,
        "without a cue the windup never ends"
    );
    assert_eq!(health(&engine, player).current, 100.0);

    assert!(engine.attack_cue(attacker, AttackCue::Begin));
    assert!(!engine.attack_cue(attacker, AttackCue::Begin), "already attacking");
    run_ticks(&mut engine, 30);
    assert_eq!(health(&engine, player).current, 80.0, "one hit per window");
    assert_eq!(combatant(&engine, attacker).recent_hits, vec![player]);

    assert!(engine.attack_cue(attacker, AttackCue::End));
    let c = combatant(&engine, attacker);
    assert_eq!(c.mode, CombatantMode::Tracking);
    assert!(c.recent_hits.is_empty());
}

#[test]
fn test_host_end_cue_cancels_the_scripted_close() {
    let config = SimConfig {
        attack_cues: CueSource::Scripted {
            windup_secs: 0.1,
            window_secs: 1.0,
        },
        ..quiet_config()
    };
    let mut engine = make_engine(config);
    let attacker = engine.spawn_combatant(Vec3::new(0.0, 0.0, 2.5), 180.0, 0.0);

    let mut ticks = 0;
    while combatant(&engine, attacker).mode != CombatantMode::Attacking {
        engine.tick();
        ticks += 1;
        assert!(ticks < 60, "first window never opened");
    }
    assert!(engine.attack_cue(attacker, AttackCue::End));
    assert_eq!(combatant(&engine, attacker).mode, CombatantMode::Tracking);
    assert!(engine.pending_tasks(attacker).is_empty());

    let mut ticks = 0;
    while combatant(&engine, attacker).mode != CombatantMode::Attacking {
        engine.tick();
        ticks += 1;
        assert!(ticks < 60, "second window never opened");
    }
    assert_eq!(
        engine.pending_tasks(attacker),
        vec![TaskKind::AttackCue(AttackCue::End)]
    );

    let opened = engine.time().elapsed_secs;
    while combatant(&engine, attacker).mode == CombatantMode::Attacking {
        engine.tick();
        assert!(engine.time().elapsed_secs < opened + 2.0, "window never closed");
    }
    let lasted = engine.time().elapsed_secs - opened;
    assert!(
        (lasted - 1.0).abs() < 1.0e-6,
        "second window lasted {lasted}s"
    );
}

#[test]
fn test_one_melee_hit_per_target_per_tick() {
    let config = SimConfig {
        attack_cues: CueSource::Host,
        ..quiet_config()
    };
    let mut engine = make_engine(config);
    let player = engine.player();
    let a = engine.spawn_combatant(Vec3::new(0.0, 0.0, 2.5), 180.0, 0.0);
    let b = engine.spawn_combatant(Vec3::new(2.5, 0.0, 0.0), 270.0, 0.0);

    engine.tick();
    assert!(engine.attack_cue(a, AttackCue::Begin));
    assert!(engine.attack_cue(b, AttackCue::Begin));

    let events = engine.tick().events;
    let hits = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Damaged { target, .. } if *target == player))
        .count();
    assert_eq!(hits, 1);
    assert_eq!(health(&engine, player).current, 80.0);

    engine.tick();
    assert_eq!(health(&engine, player).current, 60.0, "the other swing lands next tick");
}

// ---- Waves & scoring ----

#[test]
fn test_waves_grow_and_profiles_stay_in_range() {
    let mut engine = make_engine(SimConfig::default());
    let events = engine.tick().events;
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::WaveStarted { wave: 1, count: 5 })));
    assert_eq!(engine.wave(), 1);

    let spawner = engine.config().spawner.clone();
    for id in engine.live_combatants() {
        let c = combatant(&engine, id);
        assert!((spawner.health_min..=spawner.health_max).contains(&c.stats.starting_health));
        assert!((spawner.damage_min..=spawner.damage_max).contains(&c.stats.damage));
        assert_eq!(c.stats.run_speed, spawner.speed_min);
        assert!((c.stats.patrol_speed - 0.3 * spawner.speed_min).abs() < 1.0e-5);
        assert_eq!(health(&engine, id).current, c.stats.starting_health);
    }

    for id in engine.live_combatants() {
        assert!(engine.kill(id));
    }
    assert_eq!(engine.score().kills, 5);
    assert_eq!(engine.score().score, 500);

    let snapshot = engine.tick();
    assert_eq!(snapshot.wave, 2);
    assert_eq!(snapshot.live_combatants, 10);
    assert_eq!(engine.live_combatants().len(), 10);
}

#[test]
fn test_player_death_ends_the_game() {
    let mut engine = make_engine(SimConfig::default());
    let player = engine.player();
    engine.tick();

    assert!(engine.kill(player));
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert_eq!(engine.score().score, 0, "the player is not a scoring kill");
    assert!(!engine.fire(player, EMPTY_AIM));

    for id in engine.live_combatants() {
        engine.kill(id);
    }
    let events = run_ticks(&mut engine, 30);
    assert!(events.iter().any(|e| matches!(e, SimEvent::GameOver)));
    assert_eq!(count_died(&events, player), 1);
    assert!(events.iter().all(|e| !matches!(e, SimEvent::WaveStarted { .. })));
    assert_eq!(engine.wave(), 1);
}

// ---- Pickups ----

#[test]
fn test_health_and_ammo_pickups() {
    let mut engine = make_engine(quiet_config());
    let player = engine.player();

    assert!(engine.apply_damage(player, hit(60.0, None)));
    let pack = engine.spawn_pickup(Pickup::health_pack(), Vec3::new(8.0, 0.0, 8.0));
    assert!(engine.use_pickup(pack, player));
    assert_eq!(health(&engine, player).current, 90.0);
    assert!(!engine.use_pickup(pack, player), "pickups are one-shot");

    let ammo = engine.spawn_pickup(Pickup::ammo_pack(), Vec3::new(-8.0, 0.0, 8.0));
    assert!(engine.use_pickup(ammo, player));
    assert_eq!(weapon(&engine).reserve_ammo, 130);

    let events = engine.tick().events;
    assert!(engine.entity(pack).is_none());
    assert!(engine.entity(ammo).is_none());
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SimEvent::PickupUsed { applied: true, .. }))
            .count(),
        2
    );
}

#[test]
fn test_pickup_without_matching_resource_is_still_consumed() {
    let mut engine = make_engine(quiet_config());
    let grunt = engine.spawn_combatant(Vec3::new(0.0, 0.0, 15.0), 0.0, 0.0);
    let ammo = engine.spawn_pickup(Pickup::ammo_pack(), Vec3::new(8.0, 0.0, 8.0));

    assert!(engine.use_pickup(ammo, grunt));
    let events = engine.tick().events;
    assert!(engine.entity(ammo).is_none());
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::PickupUsed { applied: false, .. })));
}

#[test]
fn test_player_walks_over_pickup() {
    let mut config = quiet_config();
    config.pickups.push(skirmish_core::config::PickupPlacement {
        pickup: Pickup::ammo_pack(),
        position: Vec3::new(0.0, 0.0, 3.0),
    });
    let mut engine = make_engine(config);
    assert_eq!(engine.tick().pickups.len(), 1);

    engine.queue_command(PlayerCommand::Move {
        input: Vec2::new(0.0, 1.0),
    });
    let events = run_ticks(&mut engine, 90);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::PickupUsed { applied: true, .. })));
    assert_eq!(weapon(&engine).reserve_ammo, 130);
    assert!(engine.tick().pickups.is_empty());
}

// ---- Commands & phases ----

#[test]
fn test_pause_freezes_time_and_ignores_gameplay() {
    let mut engine = make_engine(quiet_config());
    engine.tick();
    let before = engine.time();

    engine.queue_commands([
        PlayerCommand::Pause,
        PlayerCommand::Fire {
            aim_target: EMPTY_AIM,
        },
    ]);
    run_ticks(&mut engine, 10);
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, before.tick);
    assert_eq!(weapon(&engine).mag_ammo, 30);

    engine.queue_commands([
        PlayerCommand::Resume,
        PlayerCommand::Fire {
            aim_target: EMPTY_AIM,
        },
    ]);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, before.tick + 1);
    assert_eq!(weapon(&engine).mag_ammo, 29);
}

#[test]
fn test_commands_route_to_the_player() {
    let mut engine = make_engine(quiet_config());
    engine.queue_commands([
        PlayerCommand::Fire {
            aim_target: EMPTY_AIM,
        },
        PlayerCommand::Reload,
    ]);
    let events = engine.tick().events;
    assert!(events.iter().any(|e| matches!(e, SimEvent::ShotFired { .. })));
    assert!(events.iter().any(|e| matches!(e, SimEvent::ReloadStarted { .. })));

    engine.queue_command(PlayerCommand::Face { yaw: 90.0 });
    run_ticks(&mut engine, 120);
    let snapshot = engine.tick();
    let player = snapshot.player.unwrap();
    assert!((player.yaw - 90.0).abs() < 0.5);
    assert_eq!(player.weapon.unwrap().mode, WeaponMode::Ready);
}
