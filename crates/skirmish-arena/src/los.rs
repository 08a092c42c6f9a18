//! Ground-plane line-of-sight against the arena pillars.
//!
//! Pillars are unbounded in height, so occlusion only depends on the
//! ground-plane projection of the segment.

use glam::Vec3;

use crate::geometry::segment_distance;
use crate::layout::{ground, ArenaLayout, Pillar};

/// True if the segment `from -> to`, thickened by `clearance`, touches no
/// pillar.
pub fn has_line_of_sight(layout: &ArenaLayout, from: Vec3, to: Vec3, clearance: f32) -> bool {
    first_blocker(layout, from, to, clearance).is_none()
}

/// Nearest pillar (to `from`) blocking the segment, if any.
pub fn first_blocker<'a>(
    layout: &'a ArenaLayout,
    from: Vec3,
    to: Vec3,
    clearance: f32,
) -> Option<&'a Pillar> {
    let a = ground(from);
    let b = ground(to);

    layout
        .pillars
        .iter()
        .filter(|p| segment_distance(a, b, p.center) < p.radius + clearance)
        .min_by(|p, q| {
            a.distance_squared(p.center)
                .total_cmp(&a.distance_squared(q.center))
        })
}
