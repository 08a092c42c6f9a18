#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::config::SpawnerConfig;
    use skirmish_core::enums::{AttackCue, CombatantMode, SpeedScaling};
    use skirmish_core::services::SpatialQuery;
    use skirmish_core::types::{EntityId, Hit, LayerMask, Tint};

    use crate::fsm::{
        accepts_cue, evaluate, is_legal, CombatantContext, Movement, TargetStatus, Trigger,
    };
    use crate::perception::{has_line_of_sight, in_field_of_view, select_target};
    use crate::profiles::{profile_for_intensity, roll_profile};

    const ATTACK_DISTANCE: f32 = 3.0;

    const ALL_MODES: [CombatantMode; 4] = [
        CombatantMode::Patrol,
        CombatantMode::Tracking,
        CombatantMode::AttackWindup,
        CombatantMode::Attacking,
    ];

    fn make_context(mode: CombatantMode, target: TargetStatus, trigger: Trigger) -> CombatantContext {
        CombatantContext {
            mode,
            target,
            attack_distance: ATTACK_DISTANCE,
            trigger,
        }
    }

    // ---- FSM ----

    #[test]
    fn test_patrol_acquires_target_and_tracks() {
        let ctx = make_context(
            CombatantMode::Patrol,
            TargetStatus::Live { distance: 8.0 },
            Trigger::TargetAcquired,
        );
        let update = evaluate(&ctx);
        assert!(update.mode_changed);
        assert_eq!(update.new_mode, CombatantMode::Tracking);
        assert_eq!(update.movement, Movement::Chase);
    }

    #[test]
    fn test_patrol_without_target_stays_patrol() {
        for trigger in [Trigger::Perception, Trigger::Frame, Trigger::TargetAcquired] {
            let update = evaluate(&make_context(CombatantMode::Patrol, TargetStatus::None, trigger));
            assert!(!update.mode_changed);
            assert_eq!(update.new_mode, CombatantMode::Patrol);
            assert_eq!(update.movement, Movement::Keep);
        }
    }

    #[test]
    fn test_tracking_enters_windup_in_range() {
        let ctx = make_context(
            CombatantMode::Tracking,
            TargetStatus::Live {
                distance: ATTACK_DISTANCE,
            },
            Trigger::Frame,
        );
        let update = evaluate(&ctx);
        assert_eq!(update.new_mode, CombatantMode::AttackWindup);
        assert_eq!(update.movement, Movement::Halt);
        assert!(update.windup_started);
    }

    #[test]
    fn test_tracking_out_of_range_keeps_chasing() {
        let ctx = make_context(
            CombatantMode::Tracking,
            TargetStatus::Live { distance: 6.0 },
            Trigger::Frame,
        );
        let update = evaluate(&ctx);
        assert!(!update.mode_changed);
        assert!(!update.windup_started);

        let update = evaluate(&make_context(
            CombatantMode::Tracking,
            TargetStatus::Live { distance: 6.0 },
            Trigger::Perception,
        ));
        assert_eq!(update.movement, Movement::Chase, "perception refreshes the chase");
    }

    #[test]
    fn test_begin_cue_opens_window_and_clears_hits() {
        let ctx = make_context(
            CombatantMode::AttackWindup,
            TargetStatus::Live { distance: 1.0 },
            Trigger::Cue(AttackCue::Begin),
        );
        let update = evaluate(&ctx);
        assert_eq!(update.new_mode, CombatantMode::Attacking);
        assert!(update.clear_hits);
        assert_eq!(update.movement, Movement::Keep);
    }

    #[test]
    fn test_end_cue_returns_to_tracking_or_patrol() {
        let update = evaluate(&make_context(
            CombatantMode::Attacking,
            TargetStatus::Live { distance: 1.0 },
            Trigger::Cue(AttackCue::End),
        ));
        assert_eq!(update.new_mode, CombatantMode::Tracking);
        assert_eq!(update.movement, Movement::Chase);
        assert!(update.clear_hits, "hits only persist inside the window");

        let update = evaluate(&make_context(
            CombatantMode::Attacking,
            TargetStatus::Lost,
            Trigger::Cue(AttackCue::End),
        ));
        assert_eq!(update.new_mode, CombatantMode::Patrol);
        assert_eq!(update.movement, Movement::Patrol);
        assert!(update.drop_target);
    }

    #[test]
    fn test_out_of_order_cues_are_rejected() {
        for mode in ALL_MODES {
            for cue in [AttackCue::Begin, AttackCue::End] {
                let update = evaluate(&make_context(
                    mode,
                    TargetStatus::Live { distance: 1.0 },
                    Trigger::Cue(cue),
                ));
                if accepts_cue(mode, cue) {
                    assert!(update.mode_changed, "{mode:?} should accept {cue:?}");
                } else {
                    assert!(!update.mode_changed, "{mode:?} must reject {cue:?}");
                    assert_eq!(update.movement, Movement::Keep);
                }
            }
        }
    }

    #[test]
    fn test_lost_target_returns_to_patrol_from_any_mode() {
        for mode in [
            CombatantMode::Tracking,
            CombatantMode::AttackWindup,
            CombatantMode::Attacking,
        ] {
            for trigger in [Trigger::Perception, Trigger::Frame] {
                let update = evaluate(&make_context(mode, TargetStatus::Lost, trigger));
                assert_eq!(update.new_mode, CombatantMode::Patrol);
                assert!(update.drop_target);
                assert_eq!(update.movement, Movement::Patrol, "movement resumes");
            }
        }
    }

    #[test]
    fn test_every_transition_is_on_the_graph() {
        let statuses = [
            TargetStatus::None,
            TargetStatus::Lost,
            TargetStatus::Live { distance: 1.0 },
            TargetStatus::Live { distance: 50.0 },
        ];
        let triggers = [
            Trigger::Perception,
            Trigger::TargetAcquired,
            Trigger::Frame,
            Trigger::Cue(AttackCue::Begin),
            Trigger::Cue(AttackCue::End),
        ];
        for mode in ALL_MODES {
            for target in statuses {
                for trigger in triggers {
                    let update = evaluate(&make_context(mode, target, trigger));
                    if update.mode_changed {
                        assert!(
                            is_legal(mode, update.new_mode),
                            "illegal {mode:?} -> {:?} on {trigger:?}",
                            update.new_mode
                        );
                    } else {
                        assert_eq!(update.new_mode, mode);
                    }
                }
            }
        }
    }

    #[test]
    fn test_graph_rejects_shortcuts() {
        assert!(!is_legal(CombatantMode::Patrol, CombatantMode::Attacking));
        assert!(!is_legal(CombatantMode::Patrol, CombatantMode::AttackWindup));
        assert!(!is_legal(CombatantMode::Tracking, CombatantMode::Attacking));
        assert!(!is_legal(CombatantMode::AttackWindup, CombatantMode::Tracking));
        assert!(!is_legal(CombatantMode::Patrol, CombatantMode::Patrol));
    }

    // ---- Perception ----

    struct OneHit(Option<EntityId>);

    impl SpatialQuery for OneHit {
        fn raycast(&self, origin: Vec3, direction: Vec3, _: f32, _: LayerMask) -> Option<Hit> {
            self.0.map(|entity| Hit {
                entity: Some(entity),
                point: origin + direction,
                normal: -direction,
                distance: 1.0,
            })
        }

        fn overlap_sphere(&self, _: Vec3, _: f32, _: LayerMask) -> Vec<EntityId> {
            Vec::new()
        }

        fn sphere_cast_all(&self, _: Vec3, _: f32, _: Vec3, _: f32, _: LayerMask) -> Vec<Hit> {
            Vec::new()
        }
    }

    #[test]
    fn test_view_cone() {
        let eye = Vec3::new(0.0, 0.5, 0.0);
        // 20 degrees off axis, inside a 50 degree cone.
        let inside = Vec3::new(20f32.to_radians().tan() * 5.0, 0.0, 5.0);
        assert!(in_field_of_view(eye, Vec3::Z, inside, 50.0));
        // 30 degrees off axis, outside.
        let outside = Vec3::new(30f32.to_radians().tan() * 5.0, 0.0, 5.0);
        assert!(!in_field_of_view(eye, Vec3::Z, outside, 50.0));
        assert!(!in_field_of_view(eye, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 50.0));
    }

    #[test]
    fn test_view_cone_ignores_height() {
        let eye = Vec3::new(0.0, 0.5, 0.0);
        assert!(in_field_of_view(eye, Vec3::Z, Vec3::new(0.0, 40.0, 5.0), 50.0));
    }

    #[test]
    fn test_line_of_sight_requires_target_first() {
        let target = EntityId(4);
        let eye = Vec3::ZERO;
        let pos = Vec3::new(0.0, 0.0, 5.0);
        assert!(has_line_of_sight(&OneHit(Some(target)), eye, target, pos, 10.0, LayerMask::ALL));
        assert!(!has_line_of_sight(&OneHit(Some(EntityId(9))), eye, target, pos, 10.0, LayerMask::ALL));
        assert!(!has_line_of_sight(&OneHit(None), eye, target, pos, 10.0, LayerMask::ALL));
    }

    #[test]
    fn test_select_target_takes_first_qualifying() {
        let candidates = [EntityId(3), EntityId(1), EntityId(2)];
        let picked = select_target(candidates, |id| id.0 != 3);
        assert_eq!(picked, Some(EntityId(1)));
        assert_eq!(select_target(candidates, |_| false), None);
    }

    // ---- Profiles ----

    #[test]
    fn test_profile_bounds() {
        let spawner = SpawnerConfig::default();
        let weakest = profile_for_intensity(0.0, &spawner);
        assert_eq!(weakest.health, spawner.health_min);
        assert_eq!(weakest.damage, spawner.damage_min);
        assert_eq!(weakest.tint, Tint::WHITE);

        let strongest = profile_for_intensity(1.0, &spawner);
        assert_eq!(strongest.health, spawner.health_max);
        assert_eq!(strongest.damage, spawner.damage_max);
        assert_eq!(strongest.tint, spawner.strong_tint);
    }

    #[test]
    fn test_flat_speed_uses_minimum() {
        let spawner = SpawnerConfig::default();
        assert_eq!(spawner.speed_scaling, SpeedScaling::Flat);
        for intensity in [0.0, 0.5, 1.0] {
            let profile = profile_for_intensity(intensity, &spawner);
            assert_eq!(profile.run_speed, spawner.speed_min);
            assert!((profile.patrol_speed - spawner.speed_min * 0.3).abs() < 1.0e-5);
        }
    }

    #[test]
    fn test_scaled_speed_follows_intensity() {
        let spawner = SpawnerConfig {
            speed_scaling: SpeedScaling::Scaled,
            ..Default::default()
        };
        let profile = profile_for_intensity(1.0, &spawner);
        assert_eq!(profile.run_speed, spawner.speed_max);
        let profile = profile_for_intensity(0.5, &spawner);
        assert!((profile.run_speed - 7.5).abs() < 1.0e-4);
    }

    #[test]
    fn test_rolled_profiles_stay_in_range_and_are_seeded() {
        let spawner = SpawnerConfig::default();
        let mut rng_a = ChaCha8Rng::seed_from_u64(9);
        let mut rng_b = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let a = roll_profile(&mut rng_a, &spawner);
            let b = roll_profile(&mut rng_b, &spawner);
            assert_eq!(a, b);
            assert!(a.health >= spawner.health_min && a.health <= spawner.health_max);
            assert!(a.damage >= spawner.damage_min && a.damage <= spawner.damage_max);
        }
    }
}
