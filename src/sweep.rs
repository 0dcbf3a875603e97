//! Swept axis-aligned box queries over a flat set of bodies.
//!
//! Sweeping a box of half extents `h` against a body of half extents `b`
//! is the same as casting the probe's centre segment against the body
//! grown by `h`. Each body is tested with the slab method and hits are
//! reported by time of first contact.

use glam::Vec3;
use ordered_float::OrderedFloat;

use crate::targeting::{AgentId, BoxSweep, CollisionCategory, SpatialQuery, SweepHit};

/// Below this per-axis travel the segment is treated as parallel to the slab.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-aligned collision body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Identifier reported in hits.
    pub id: AgentId,
    /// World position of the box centre.
    pub center: Vec3,
    /// Half extents of the box.
    pub half_extents: Vec3,
    /// Collision channel.
    pub category: CollisionCategory,
}

impl Body {
    /// Creates an agent body.
    #[must_use]
    pub const fn agent(id: AgentId, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            center,
            half_extents,
            category: CollisionCategory::Agent,
        }
    }

    /// Creates a static level body.
    #[must_use]
    pub const fn world_static(id: AgentId, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            center,
            half_extents,
            category: CollisionCategory::WorldStatic,
        }
    }
}

/// Flat collection of bodies answering [`SpatialQuery`].
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    /// Adds or replaces the body with the same id.
    pub fn insert(&mut self, body: Body) {
        if let Some(existing) = self.bodies.iter_mut().find(|b| b.id == body.id) {
            *existing = body;
        } else {
            self.bodies.push(body);
        }
    }

    /// Removes the body with `id`, returning it if present.
    pub fn remove(&mut self, id: AgentId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.swap_remove(index))
    }

    /// Looks up a body by id.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Number of bodies.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` when the set holds no bodies.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl FromIterator<Body> for BodySet {
    fn from_iter<I: IntoIterator<Item = Body>>(iter: I) -> Self {
        let mut set = Self::default();
        for body in iter {
            set.insert(body);
        }
        set
    }
}

impl SpatialQuery for BodySet {
    fn sweep_box(&self, sweep: &BoxSweep) -> Vec<SweepHit> {
        let mut hits: Vec<SweepHit> = self
            .bodies
            .iter()
            .filter(|body| body.category == sweep.category && Some(body.id) != sweep.ignore)
            .filter_map(|body| {
                let time = segment_box_entry(
                    sweep.start,
                    sweep.end,
                    body.center,
                    body.half_extents + sweep.half_extents,
                )?;
                Some(SweepHit {
                    agent: body.id,
                    category: body.category,
                    position: body.center,
                    time,
                })
            })
            .collect();
        hits.sort_by_key(|hit| OrderedFloat(hit.time));
        hits
    }
}

/// Entry time in `[0, 1]` of the segment `start..end` into the box, or
/// `None` when they never overlap. Starting inside the box enters at zero.
#[must_use]
pub fn segment_box_entry(start: Vec3, end: Vec3, center: Vec3, half_extents: Vec3) -> Option<f32> {
    let travel = end - start;
    let min = center - half_extents;
    let max = center + half_extents;

    let mut entry = 0.0_f32;
    let mut exit = 1.0_f32;
    let axes = start
        .to_array()
        .into_iter()
        .zip(travel.to_array())
        .zip(min.to_array().into_iter().zip(max.to_array()));

    for ((origin, delta), (lo, hi)) in axes {
        if delta.abs() < PARALLEL_EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let to_lo = (lo - origin) / delta;
        let to_hi = (hi - origin) / delta;
        entry = entry.max(to_lo.min(to_hi));
        exit = exit.min(to_lo.max(to_hi));
        if entry > exit {
            return None;
        }
    }
    Some(entry)
}
