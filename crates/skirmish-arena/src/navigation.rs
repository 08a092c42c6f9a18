//! ArenaNavigation: navigable-point sampling and pillar-avoiding paths.
//!
//! The navigable region is the floor inset by the agent radius, minus the
//! pillars grown by the agent radius. Paths are a straight line when it
//! is clear, otherwise a single detour waypoint beside the first blocking
//! pillar.

use glam::{Vec2, Vec3};
use skirmish_core::services::Navigation;

use crate::layout::{ground, ArenaLayout, Pillar};
use crate::los::{first_blocker, has_line_of_sight};

/// Multiples of the grown pillar radius tried for detour waypoints.
const DETOUR_SCALES: [f32; 3] = [1.5, 2.0, 3.0];

/// Navigation service backed by an [`ArenaLayout`].
#[derive(Debug, Clone)]
pub struct ArenaNavigation {
    layout: ArenaLayout,
    agent_radius: f32,
}

impl ArenaNavigation {
    pub fn new(layout: ArenaLayout, agent_radius: f32) -> Self {
        Self {
            layout,
            agent_radius: agent_radius.max(0.0),
        }
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    /// Nearest navigable ground-plane point, ignoring search distance.
    fn project(&self, point: Vec2) -> Option<Vec2> {
        let mut p = self.layout.clamp_to_floor(point, self.agent_radius);

        for pillar in &self.layout.pillars {
            if pillar.contains(p, self.agent_radius) {
                p = push_out(pillar, p, self.agent_radius);
            }
        }

        let blocked = self
            .layout
            .pillars
            .iter()
            .any(|pillar| pillar.contains(p, self.agent_radius - 1.0e-3));
        if blocked || !self.layout.in_bounds(p, self.agent_radius - 1.0e-3) {
            return None;
        }
        Some(p)
    }

    fn clear(&self, from: Vec3, to: Vec3) -> bool {
        has_line_of_sight(&self.layout, from, to, self.agent_radius)
    }

    fn detour(&self, from: Vec3, to: Vec3, pillar: &Pillar) -> Option<Vec3> {
        let a = ground(from);
        let b = ground(to);
        let axis = (b - a).normalize_or_zero();
        if axis == Vec2::ZERO {
            return None;
        }
        let side = axis.perp();
        let grown = pillar.radius + self.agent_radius;

        let mut fallback: Option<(f32, Vec3)> = None;
        for scale in DETOUR_SCALES {
            let mut candidates: Vec<(f32, Vec3)> = [1.0, -1.0]
                .into_iter()
                .map(|sign| pillar.center + side * (sign * grown * scale))
                .filter(|&w| self.layout.in_bounds(w, self.agent_radius))
                .map(|w| {
                    let point = self.layout.to_world(w);
                    (a.distance(w) + w.distance(b), point)
                })
                .collect();
            candidates.sort_by(|x, y| x.0.total_cmp(&y.0));

            for &(length, waypoint) in &candidates {
                if self.clear(from, waypoint) && self.clear(waypoint, to) {
                    return Some(waypoint);
                }
                if fallback.map_or(true, |(best, _)| length < best) {
                    fallback = Some((length, waypoint));
                }
            }
        }

        if fallback.is_some() {
            log::debug!("no clear detour around pillar at {}, using closest", pillar.center);
        }
        fallback.map(|(_, waypoint)| waypoint)
    }
}

/// Move `point` radially to the surface of `pillar` grown by `clearance`.
fn push_out(pillar: &Pillar, point: Vec2, clearance: f32) -> Vec2 {
    let offset = point - pillar.center;
    let direction = if offset.length_squared() < 1.0e-12 {
        Vec2::X
    } else {
        offset.normalize()
    };
    pillar.center + direction * (pillar.radius + clearance)
}

impl Navigation for ArenaNavigation {
    fn nearest_navigable_point(
        &self,
        origin: Vec3,
        max_distance: f32,
        area_mask: u32,
    ) -> Option<Vec3> {
        if area_mask == 0 {
            return None;
        }
        let point = self.layout.to_world(self.project(ground(origin))?);
        (point.distance(origin) <= max_distance).then_some(point)
    }

    fn find_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3> {
        let Some(end) = self.project(ground(to)) else {
            return Vec::new();
        };
        let end = self.layout.to_world(end);

        match first_blocker(&self.layout, from, end, self.agent_radius) {
            None => vec![end],
            Some(pillar) => match self.detour(from, end, pillar) {
                Some(waypoint) => vec![waypoint, end],
                None => Vec::new(),
            },
        }
    }
}
