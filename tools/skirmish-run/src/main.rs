//! skirmish-run: headless driver for the Skirmish simulation.
//!
//! Usage:
//!   skirmish-run --ticks 3600 --seed 7 --summary
//!   skirmish-run --config tuning.json --arena arena.json --autofire --output final.json

use std::path::PathBuf;
use std::process;

use skirmish_arena::ArenaLayout;
use skirmish_core::commands::PlayerCommand;
use skirmish_core::config::SimConfig;
use skirmish_core::enums::{GamePhase, WeaponMode};
use skirmish_core::events::SimEvent;
use skirmish_core::state::GameStateSnapshot;
use skirmish_sim::SimulationEngine;

const DEFAULT_TICKS: u64 = 60 * 60;

/// Ticks between autopilot trigger pulls.
const AUTOFIRE_INTERVAL: u64 = 10;

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut config = match parse_path(&args, "--config") {
        Some(path) => SimConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {e}", path.display());
            process::exit(1);
        }),
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_number(&args, "--seed") {
        config.seed = seed;
    }

    let layout = match parse_path(&args, "--arena") {
        Some(path) => ArenaLayout::load(&path).unwrap_or_else(|e| {
            eprintln!("Error loading arena {}: {e}", path.display());
            process::exit(1);
        }),
        None => ArenaLayout::default(),
    };

    let ticks = parse_number(&args, "--ticks").unwrap_or(DEFAULT_TICKS);
    let autofire = args.iter().any(|a| a == "--autofire");
    let summary = args.iter().any(|a| a == "--summary");
    let output = parse_path(&args, "--output");

    let seed = config.seed;
    let mut engine = SimulationEngine::headless(config, layout).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        process::exit(1);
    });
    log::info!("running {ticks} ticks (seed {seed}, autofire: {autofire})");

    let mut stats = RunStats::default();
    let mut last = GameStateSnapshot::default();
    for tick in 0..ticks {
        if autofire {
            queue_autopilot(&mut engine, &last, tick);
        }
        last = engine.tick();
        stats.record(&last.events);
        if last.phase == GamePhase::GameOver && stats.game_over_tick.is_none() {
            stats.game_over_tick = Some(tick);
        }
    }

    log::info!(
        "finished at tick {}: wave {}, score {}",
        last.time.tick,
        last.wave,
        last.score.score
    );

    if summary {
        print_summary(&last, &stats);
    }

    if let Some(path) = output {
        let json = match serde_json::to_string_pretty(&last) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&path, json) {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        }
        eprintln!("Wrote final snapshot to {}", path.display());
    }
}

fn print_usage() {
    eprintln!(
        "skirmish-run: headless Skirmish simulation driver\n\
         \n\
           --config <path>  Simulation tuning JSON (default: built-in tuning)\n\
           --arena <path>   Arena layout JSON (default: empty 40x40 arena)\n\
           --ticks <N>      Ticks to simulate (default: 3600, one minute)\n\
           --seed <N>       Override the RNG seed\n\
           --autofire       Aim at the nearest combatant and keep firing\n\
           --summary        Print a run summary\n\
           --output <path>  Write the final snapshot as JSON\n\
         \n\
         Logging follows RUST_LOG (default: info).\n"
    );
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| PathBuf::from(&pair[1]))
}

fn parse_number(args: &[String], flag: &str) -> Option<u64> {
    let pair = args.windows(2).find(|pair| pair[0] == flag)?;
    match pair[1].parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a whole number, got {}", pair[1]);
            process::exit(1);
        }
    }
}

// --- Autopilot ---

fn queue_autopilot(engine: &mut SimulationEngine, last: &GameStateSnapshot, tick: u64) {
    let Some(player) = &last.player else {
        return;
    };
    if player.dead {
        return;
    }

    let nearest = last
        .combatants
        .iter()
        .filter(|c| !c.dead)
        .min_by(|a, b| {
            a.position
                .distance_squared(player.position)
                .total_cmp(&b.position.distance_squared(player.position))
        });
    let Some(target) = nearest else {
        return;
    };

    let to_target = target.position - player.position;
    engine.queue_command(PlayerCommand::Face {
        yaw: to_target.x.atan2(to_target.z).to_degrees(),
    });

    match player.weapon.as_ref().map(|w| w.mode) {
        Some(WeaponMode::Empty) => engine.queue_command(PlayerCommand::Reload),
        Some(WeaponMode::Ready) if tick % AUTOFIRE_INTERVAL == 0 => {
            engine.queue_command(PlayerCommand::Fire {
                aim_target: target.position,
            });
        }
        _ => {}
    }
}

// --- Summary ---

#[derive(Debug, Default)]
struct RunStats {
    shots: u32,
    hits: u32,
    deaths: u32,
    waves: u32,
    pickups: u32,
    game_over_tick: Option<u64>,
}

impl RunStats {
    fn record(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::ShotFired { hit, .. } => {
                    self.shots += 1;
                    self.hits += u32::from(hit.is_some());
                }
                SimEvent::Died { .. } => self.deaths += 1,
                SimEvent::WaveStarted { .. } => self.waves += 1,
                SimEvent::PickupUsed { .. } => self.pickups += 1,
                _ => {}
            }
        }
    }
}

fn print_summary(last: &GameStateSnapshot, stats: &RunStats) {
    println!("=== Skirmish run ===");
    println!(
        "Time:        {:.2}s ({} ticks)",
        last.time.elapsed_secs, last.time.tick
    );
    println!("Phase:       {:?}", last.phase);
    println!(
        "Wave:        {} ({} waves started, {} combatants alive)",
        last.wave, stats.waves, last.live_combatants
    );
    println!(
        "Score:       {} ({} kills)",
        last.score.score, last.score.kills
    );
    println!("Shots:       {} ({} hits)", stats.shots, stats.hits);
    println!("Deaths:      {}", stats.deaths);
    println!("Pickups:     {}", stats.pickups);
    if let Some(player) = &last.player {
        println!(
            "Player:      {:.0}/{:.0} hp at {}",
            player.health, player.starting_health, player.position
        );
        if let Some(weapon) = &player.weapon {
            println!(
                "Weapon:      {:?}, {}/{} + {} reserve",
                weapon.mode, weapon.mag_ammo, weapon.magazine_capacity, weapon.reserve_ammo
            );
        }
    }
    if let Some(tick) = stats.game_over_tick {
        println!("Game over at tick {tick}");
    }
}
