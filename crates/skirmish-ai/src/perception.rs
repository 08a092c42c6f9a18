//! View-cone and line-of-sight checks.
//!
//! A candidate is seen when it lies inside the horizontal view cone and
//! the first thing a ray from the eye toward it strikes is the candidate
//! itself.

use glam::Vec3;
use skirmish_core::math::angle_between;
use skirmish_core::services::SpatialQuery;
use skirmish_core::types::{EntityId, LayerMask};

/// True when `target` lies within half of `field_of_view` degrees of
/// `forward`. The vertical offset to the target is ignored.
pub fn in_field_of_view(eye: Vec3, forward: Vec3, target: Vec3, field_of_view: f32) -> bool {
    let mut direction = target - eye;
    direction.y = forward.y;
    angle_between(direction, forward) <= field_of_view * 0.5
}

/// Raycast from `eye` toward `target_position`; seen when the nearest hit
/// within `view_distance` belongs to `target`.
pub fn has_line_of_sight(
    physics: &dyn SpatialQuery,
    eye: Vec3,
    target: EntityId,
    target_position: Vec3,
    view_distance: f32,
    mask: LayerMask,
) -> bool {
    let direction = (target_position - eye).normalize_or_zero();
    if direction == Vec3::ZERO {
        return true;
    }
    physics
        .raycast(eye, direction, view_distance, mask)
        .is_some_and(|hit| hit.entity == Some(target))
}

/// First candidate, in query order, that passes `qualifies`.
pub fn select_target<I, F>(candidates: I, mut qualifies: F) -> Option<EntityId>
where
    I: IntoIterator<Item = EntityId>,
    F: FnMut(EntityId) -> bool,
{
    candidates.into_iter().find(|&candidate| qualifies(candidate))
}
