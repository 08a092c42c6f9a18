//! Weapon system: hitscan fire, reload, recoil settle and equip state.

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{Health, Tracer, Transform, Weapon};
use skirmish_core::constants::{DT, SHOT_EFFECT_SECS};
use skirmish_core::enums::WeaponMode;
use skirmish_core::events::SimEvent;
use skirmish_core::living::DamageMessage;
use skirmish_core::math::smooth_damp;
use skirmish_core::services::SpatialQuery;
use skirmish_core::types::forward_from_yaw;

use super::combatant::CueClock;
use super::damage;
use crate::ids::{entity_id, resolve};
use crate::outbox::Outbox;
use crate::timers::{TaskKind, TimerQueue};

/// Sample from N(mean, std_dev) with the Box-Muller transform.
/// Always consumes two draws so the stream stays aligned.
pub fn normal_sample(rng: &mut ChaCha8Rng, mean: f32, std_dev: f32) -> f32 {
    let u1: f32 = 1.0 - rng.gen::<f32>();
    let u2: f32 = rng.gen();
    if std_dev <= 0.0 {
        return mean;
    }
    let z = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
    mean + z * std_dev
}

/// Rotate `direction` by a yaw error about world up and a pitch error
/// about the shot's right axis, both in degrees.
fn deviate(direction: Vec3, yaw_error: f32, pitch_error: f32) -> Vec3 {
    let direction = Quat::from_axis_angle(Vec3::Y, yaw_error.to_radians()) * direction;
    let mut right = Vec3::Y.cross(direction).normalize_or_zero();
    if right == Vec3::ZERO {
        right = Vec3::X;
    }
    (Quat::from_axis_angle(right, pitch_error.to_radians()) * direction).normalize_or_zero()
}

/// Fire `shooter`'s weapon toward `aim_target`. Returns false when the
/// weapon is missing, disabled, not ready, still cycling, or its holder
/// is dead.
#[allow(clippy::too_many_arguments)]
pub fn fire(
    world: &World,
    physics: &dyn SpatialQuery,
    rng: &mut ChaCha8Rng,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    clock: CueClock,
    shooter: Entity,
    aim_target: Vec3,
) -> bool {
    let holder_dead = world
        .get::<&Health>(shooter)
        .map(|health| health.is_dead)
        .unwrap_or(false);
    if holder_dead {
        return false;
    }
    let Ok(transform) = world.get::<&Transform>(shooter).map(|t| *t) else {
        return false;
    };

    let (muzzle, direction, fire_distance, damage) = {
        let Ok(mut weapon) = world.get::<&mut Weapon>(shooter) else {
            return false;
        };
        if !weapon.enabled || weapon.mode != WeaponMode::Ready {
            return false;
        }
        if let Some(last) = weapon.last_fire_secs {
            if clock.now - last < weapon.stats.time_between_shots {
                return false;
            }
        }

        let muzzle = transform.position + Vec3::Y * weapon.stats.muzzle_height;
        let mut aim = (aim_target - muzzle).normalize_or_zero();
        if aim == Vec3::ZERO {
            aim = forward_from_yaw(transform.yaw);
        }

        let pitch_error = normal_sample(rng, 0.0, weapon.current_spread);
        let yaw_error = normal_sample(rng, 0.0, weapon.current_spread);
        let direction = deviate(aim, yaw_error, pitch_error);

        let max_spread = weapon.stats.max_spread;
        weapon.current_spread = (weapon.current_spread + 1.0 / weapon.stats.stability).min(max_spread);
        weapon.last_fire_secs = Some(clock.now);

        (muzzle, direction, weapon.stats.fire_distance, weapon.stats.damage)
    };

    let exclude = world
        .get::<&Weapon>(shooter)
        .map(|weapon| weapon.stats.exclude_layers)
        .unwrap_or_default();
    let shooter_id = entity_id(shooter);

    let hit = physics.raycast(muzzle, direction, fire_distance, !exclude);
    let end = match hit {
        Some(hit) => {
            let target = hit.entity.and_then(|id| resolve(world, id));
            let damageable = target.filter(|&t| world.get::<&Health>(t).is_ok());
            match damageable {
                Some(target) => {
                    let message = DamageMessage::new(damage, Some(shooter_id), hit.point, hit.normal);
                    damage::apply(world, timers, outbox, clock, target, &message);
                }
                None => outbox.emit(SimEvent::Impact {
                    point: hit.point,
                    normal: hit.normal,
                }),
            }
            hit.point
        }
        None => muzzle + direction * fire_distance,
    };

    if let Ok(mut weapon) = world.get::<&mut Weapon>(shooter) {
        weapon.tracer = Some(Tracer {
            from: muzzle,
            to: end,
        });
        weapon.mag_ammo = weapon.mag_ammo.saturating_sub(1);
        if weapon.mag_ammo == 0 {
            weapon.mode = WeaponMode::Empty;
        }
    }
    timers.cancel(shooter, |kind| kind == TaskKind::TracerEnd);
    timers.schedule(shooter, clock.now + SHOT_EFFECT_SECS, TaskKind::TracerEnd);

    outbox.emit(SimEvent::ShotFired {
        shooter: shooter_id,
        from: muzzle,
        to: end,
        hit: hit.and_then(|h| h.entity),
    });
    true
}

/// Start a reload. Returns false while reloading, with no reserve, with a
/// full magazine, or when the weapon is disabled.
pub fn reload(
    world: &World,
    timers: &mut TimerQueue,
    outbox: &mut Outbox,
    shooter: Entity,
    now: f64,
) -> bool {
    let reload_time = {
        let Ok(mut weapon) = world.get::<&mut Weapon>(shooter) else {
            return false;
        };
        if !weapon.enabled
            || weapon.mode == WeaponMode::Reloading
            || weapon.reserve_ammo == 0
            || weapon.mag_ammo >= weapon.stats.magazine_capacity
        {
            return false;
        }
        weapon.mode = WeaponMode::Reloading;
        weapon.stats.reload_time
    };

    timers.schedule(shooter, now + reload_time, TaskKind::ReloadComplete);
    outbox.emit(SimEvent::ReloadStarted {
        shooter: entity_id(shooter),
    });
    true
}

/// Finish a reload: move rounds from the reserve into the magazine.
pub fn complete_reload(world: &World, outbox: &mut Outbox, shooter: Entity) {
    let Ok(mut weapon) = world.get::<&mut Weapon>(shooter) else {
        return;
    };
    if weapon.mode != WeaponMode::Reloading {
        return;
    }

    let missing = weapon.stats.magazine_capacity.saturating_sub(weapon.mag_ammo);
    let transferred = missing.min(weapon.reserve_ammo);
    weapon.mag_ammo += transferred;
    weapon.reserve_ammo -= transferred;
    weapon.mode = if weapon.mag_ammo > 0 {
        WeaponMode::Ready
    } else {
        WeaponMode::Empty
    };

    outbox.emit(SimEvent::ReloadCompleted {
        shooter: entity_id(shooter),
        transferred,
    });
}

/// Hide the shot tracer.
pub fn end_tracer(world: &World, shooter: Entity) {
    if let Ok(mut weapon) = world.get::<&mut Weapon>(shooter) {
        weapon.tracer = None;
    }
}

/// Equip or holster. Equipping refills the magazine and resets spread
/// and fire timing; holstering abandons any pending reload or tracer.
/// Returns false when there is no weapon or nothing changes.
pub fn set_enabled(world: &World, timers: &mut TimerQueue, shooter: Entity, enabled: bool) -> bool {
    let Ok(mut weapon) = world.get::<&mut Weapon>(shooter) else {
        return false;
    };
    if weapon.enabled == enabled {
        return false;
    }

    weapon.enabled = enabled;
    if enabled {
        weapon.mag_ammo = weapon.stats.magazine_capacity;
        weapon.current_spread = 0.0;
        weapon.spread_velocity = 0.0;
        weapon.last_fire_secs = None;
        weapon.mode = WeaponMode::Ready;
    } else {
        weapon.tracer = None;
        timers.cancel(shooter, |kind| {
            matches!(kind, TaskKind::ReloadComplete | TaskKind::TracerEnd)
        });
    }
    true
}

/// Add rounds to the reserve. Returns false without a weapon.
pub fn add_reserve(world: &World, holder: Entity, rounds: u32) -> bool {
    let Ok(mut weapon) = world.get::<&mut Weapon>(holder) else {
        return false;
    };
    weapon.reserve_ammo = weapon.reserve_ammo.saturating_add(rounds);
    true
}

/// Settle recoil on every enabled weapon.
pub fn decay_recoil(world: &mut World) {
    for (_entity, weapon) in world.query_mut::<&mut Weapon>() {
        if !weapon.enabled {
            continue;
        }
        let max_spread = weapon.stats.max_spread;
        let smooth_time = 1.0 / weapon.stats.restore_from_recoil_speed;
        let spread = weapon.current_spread.clamp(0.0, max_spread);
        weapon.current_spread = smooth_damp(
            spread,
            0.0,
            &mut weapon.spread_velocity,
            smooth_time,
            f32::INFINITY,
            DT,
        )
        .clamp(0.0, max_spread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_normal_sample_zero_spread_is_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(normal_sample(&mut rng, 0.0, 0.0), 0.0);
        }
    }

    #[test]
    fn test_normal_sample_statistics() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let samples: Vec<f32> = (0..20_000).map(|_| normal_sample(&mut rng, 0.0, 2.0)).collect();
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn test_deviation_angles() {
        let dir = deviate(Vec3::Z, 90.0, 0.0);
        assert!((dir - Vec3::X).length() < 1.0e-5, "yaw error turns about up: {dir}");
        let dir = deviate(Vec3::Z, 0.0, 10.0);
        let angle = dir.angle_between(Vec3::Z).to_degrees();
        assert!((angle - 10.0).abs() < 1.0e-3);
        assert!(dir.y.abs() > 0.1, "pitch error leaves the ground plane");
    }
}
