//! Player locomotion: smoothed speed and turning driven by the movement
//! commands, resolved against the navigable floor.

use glam::Vec3;
use hecs::World;

use skirmish_core::components::{Health, Player, PlayerMotion, Transform};
use skirmish_core::config::PlayerConfig;
use skirmish_core::constants::{ALL_NAV_AREAS, DT};
use skirmish_core::math::{smooth_damp, smooth_damp_angle};
use skirmish_core::services::Navigation;
use skirmish_core::types::forward_from_yaw;

/// Extra search radius when snapping the player's next step to the floor.
const STEP_SNAP_MARGIN: f32 = 1.0;

pub fn run(world: &mut World, navigation: &dyn Navigation, config: &PlayerConfig) {
    for (_entity, (_player, transform, motion, health)) in
        world.query_mut::<(&Player, &mut Transform, &mut PlayerMotion, &Health)>()
    {
        if health.is_dead {
            motion.current_speed = 0.0;
            continue;
        }

        if let Some(target_yaw) = motion.target_yaw {
            transform.yaw = smooth_damp_angle(
                transform.yaw,
                target_yaw,
                &mut motion.turn_velocity,
                config.turn_smooth_time,
                f32::INFINITY,
                DT,
            );
        }

        let input = motion.move_input;
        let target_speed = config.speed * input.length().min(1.0);
        let speed = smooth_damp(
            motion.current_speed,
            target_speed,
            &mut motion.speed_velocity,
            config.speed_smooth_time,
            f32::INFINITY,
            DT,
        );

        let forward = forward_from_yaw(transform.yaw);
        let right = forward_from_yaw(transform.yaw + 90.0);
        let direction = (forward * input.y + right * input.x).normalize_or_zero();
        if direction == Vec3::ZERO || speed <= 0.0 {
            motion.current_speed = 0.0;
            continue;
        }

        let step = speed * DT;
        let desired = transform.position + direction * step;
        let Some(resolved) =
            navigation.nearest_navigable_point(desired, step + STEP_SNAP_MARGIN, ALL_NAV_AREAS)
        else {
            motion.current_speed = 0.0;
            continue;
        };

        let moved = Vec3::new(
            resolved.x - transform.position.x,
            0.0,
            resolved.z - transform.position.z,
        );
        transform.position = resolved;
        motion.current_speed = moved.length() / DT;
    }
}
