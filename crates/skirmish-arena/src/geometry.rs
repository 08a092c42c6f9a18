//! Ray and sweep intersection against spheres and vertical pillars.
//!
//! Directions are unit vectors and distances are measured along them.
//! Rays starting inside a shape do not hit it. Sweeps starting in contact
//! with a shape hit it at distance 0.

use glam::{Vec2, Vec3};

use crate::layout::ground;

/// Entry distance of a ray into a sphere.
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = m.dot(direction);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

/// Entry distance of a ray into an infinite vertical cylinder.
pub fn ray_pillar(origin: Vec3, direction: Vec3, center: Vec2, radius: f32) -> Option<f32> {
    let d = ground(direction);
    let a = d.length_squared();
    if a < 1.0e-12 {
        return None;
    }
    let m = ground(origin) - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = m.dot(d);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()) / a)
}

/// Outward surface normal of a sphere at `point`.
pub fn sphere_normal(point: Vec3, center: Vec3) -> Vec3 {
    (point - center).normalize_or_zero()
}

/// Outward surface normal of a pillar at `point`. Always horizontal.
pub fn pillar_normal(point: Vec3, center: Vec2) -> Vec3 {
    let n = (ground(point) - center).normalize_or_zero();
    Vec3::new(n.x, 0.0, n.y)
}

/// Contact distance of a sphere of `radius` swept from `origin` against a
/// sphere collider. `Some(0.0)` when they already touch.
pub fn sweep_sphere(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    center: Vec3,
    other_radius: f32,
) -> Option<f32> {
    let reach = radius + other_radius;
    if origin.distance_squared(center) <= reach * reach {
        return Some(0.0);
    }
    ray_sphere(origin, direction, center, reach)
}

/// Contact distance of a sphere swept against a pillar.
pub fn sweep_pillar(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    center: Vec2,
    pillar_radius: f32,
) -> Option<f32> {
    let reach = radius + pillar_radius;
    if ground(origin).distance_squared(center) <= reach * reach {
        return Some(0.0);
    }
    ray_pillar(origin, direction, center, reach)
}

/// Shortest ground-plane distance from `point` to the segment `a -> b`.
pub fn segment_distance(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1.0e-12 {
        return a.distance(point);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(point)
}
