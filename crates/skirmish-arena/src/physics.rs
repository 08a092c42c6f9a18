//! ArenaPhysics: spatial queries over entity spheres and static pillars.
//!
//! Entity colliders are keyed by id and iterated in id order, which keeps
//! overlap results deterministic. Pillars are reported on the environment
//! layer with no owning entity.

use std::collections::BTreeMap;

use glam::Vec3;
use skirmish_core::constants::MAX_SWEEP_HITS;
use skirmish_core::services::SpatialQuery;
use skirmish_core::types::{EntityId, Hit, LayerMask};

use crate::geometry::{pillar_normal, ray_pillar, ray_sphere, sphere_normal, sweep_pillar, sweep_sphere};
use crate::layout::ArenaLayout;

#[derive(Debug, Clone, Copy)]
struct Body {
    center: Vec3,
    radius: f32,
    layer: LayerMask,
}

/// Spatial query service backed by an [`ArenaLayout`].
#[derive(Debug, Clone)]
pub struct ArenaPhysics {
    layout: ArenaLayout,
    bodies: BTreeMap<EntityId, Body>,
}

impl ArenaPhysics {
    pub fn new(layout: ArenaLayout) -> Self {
        Self {
            layout,
            bodies: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    /// Number of registered entity colliders.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn bodies_in(&self, mask: LayerMask) -> impl Iterator<Item = (EntityId, &Body)> {
        self.bodies
            .iter()
            .filter(move |(_, body)| mask.intersects(body.layer))
            .map(|(&id, body)| (id, body))
    }
}

impl SpatialQuery for ArenaPhysics {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut best: Option<Hit> = None;
        let mut consider = |hit: Hit| {
            if hit.distance <= max_distance && best.map_or(true, |b| hit.distance < b.distance) {
                best = Some(hit);
            }
        };

        for (id, body) in self.bodies_in(mask) {
            if let Some(t) = ray_sphere(origin, direction, body.center, body.radius) {
                let point = origin + direction * t;
                consider(Hit {
                    entity: Some(id),
                    point,
                    normal: sphere_normal(point, body.center),
                    distance: t,
                });
            }
        }

        if mask.intersects(LayerMask::ENVIRONMENT) {
            for pillar in &self.layout.pillars {
                if let Some(t) = ray_pillar(origin, direction, pillar.center, pillar.radius) {
                    let point = origin + direction * t;
                    consider(Hit {
                        entity: None,
                        point,
                        normal: pillar_normal(point, pillar.center),
                        distance: t,
                    });
                }
            }
        }

        best
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<EntityId> {
        self.bodies_in(mask)
            .filter(|(_, body)| {
                let reach = radius + body.radius;
                center.distance_squared(body.center) <= reach * reach
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit> {
        let direction = direction.normalize_or_zero();
        let mut hits = Vec::new();

        for (id, body) in self.bodies_in(mask) {
            let Some(t) = sweep_sphere(origin, radius, direction, body.center, body.radius) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            hits.push(if t <= 0.0 {
                Hit {
                    entity: Some(id),
                    point: origin,
                    normal: -direction,
                    distance: 0.0,
                }
            } else {
                let normal = sphere_normal(origin + direction * t, body.center);
                Hit {
                    entity: Some(id),
                    point: body.center + normal * body.radius,
                    normal,
                    distance: t,
                }
            });
        }

        if mask.intersects(LayerMask::ENVIRONMENT) {
            for pillar in &self.layout.pillars {
                let Some(t) = sweep_pillar(origin, radius, direction, pillar.center, pillar.radius)
                else {
                    continue;
                };
                if t > max_distance {
                    continue;
                }
                let center = origin + direction * t;
                let normal = pillar_normal(center, pillar.center);
                hits.push(Hit {
                    entity: None,
                    point: center - normal * radius,
                    normal,
                    distance: t,
                });
            }
        }

        // Stable sort keeps id order among equal distances.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(MAX_SWEEP_HITS);
        hits
    }

    fn sync_collider(&mut self, entity: EntityId, center: Vec3, radius: f32, layer: LayerMask) {
        self.bodies.insert(
            entity,
            Body {
                center,
                radius,
                layer,
            },
        );
    }

    fn remove_collider(&mut self, entity: EntityId) {
        self.bodies.remove(&entity);
    }
}
