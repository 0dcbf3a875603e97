//! Target acquisition for the soft-lock focus system.
//!
//! A box probe is swept along the viewer's forward axis and every agent it
//! touches becomes a focus candidate. The spatial query itself is a
//! collaborator behind [`SpatialQuery`]; [`crate::sweep::BodySet`] is the
//! in-crate implementation.

use glam::Vec3;
use hashbrown::HashSet;
use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::FocusSettings;

/// Stable handle for a body known to the spatial query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl AgentId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

/// Collision channel a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionCategory {
    /// Immovable level geometry.
    #[default]
    WorldStatic,
    /// Simulated props.
    WorldDynamic,
    /// Controllable characters, player or AI.
    Agent,
}

/// Position and facing of the controlling view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoint {
    /// World position of the camera.
    pub position: Vec3,
    /// Direction the camera looks along; need not be normalised.
    pub forward: Vec3,
}

/// Parameters of a single box sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSweep {
    /// Viewer position the sweep was derived from.
    pub origin: Vec3,
    /// Centre of the probe at the start of the sweep.
    pub start: Vec3,
    /// Centre of the probe at the end of the sweep.
    pub end: Vec3,
    /// Half extents of the axis-aligned probe.
    pub half_extents: Vec3,
    /// Only bodies in this channel are reported.
    pub category: CollisionCategory,
    /// Body excluded from the results, normally the viewer's own.
    pub ignore: Option<AgentId>,
}

impl BoxSweep {
    /// Builds the acquisition sweep for `view`.
    ///
    /// The probe travels from `sweep_start_offset` to `search_radius` units
    /// ahead of the viewer and only reports agents.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::DegenerateView`] when the view direction
    /// has no usable length.
    pub fn from_view(
        view: &ViewPoint,
        settings: &FocusSettings,
        ignore: Option<AgentId>,
    ) -> Result<Self, AcquisitionError> {
        let forward = view
            .forward
            .try_normalize()
            .ok_or(AcquisitionError::DegenerateView)?;
        Ok(Self {
            origin: view.position,
            start: view.position + forward * settings.sweep_start_offset,
            end: view.position + forward * settings.search_radius,
            half_extents: settings.probe_half_extents,
            category: CollisionCategory::Agent,
            ignore,
        })
    }
}

/// A body touched by a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Identifier of the touched body.
    pub agent: AgentId,
    /// Channel of the touched body.
    pub category: CollisionCategory,
    /// World position of the body.
    pub position: Vec3,
    /// Fraction of the sweep travelled at first contact, in `[0, 1]`.
    pub time: f32,
}

/// Spatial query capability required by acquisition.
#[cfg_attr(test, mockall::automock)]
pub trait SpatialQuery {
    /// Returns every body the swept box intersects, in sweep order.
    fn sweep_box(&self, sweep: &BoxSweep) -> Vec<SweepHit>;
}

/// Returns `true` when the hit body can be focused.
#[must_use]
pub const fn is_focusable(hit: &SweepHit) -> bool {
    matches!(hit.category, CollisionCategory::Agent)
}

/// How acquired candidates are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CandidateOrder {
    /// Nearest to the viewer first; ties keep sweep order.
    #[default]
    Nearest,
    /// Order of first contact reported by the query.
    SweepOrder,
}

/// Failure to produce a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// No controller or camera to sweep from.
    #[error("no view point available for target acquisition")]
    NoViewPoint,
    /// The view direction has zero or non-finite length.
    #[error("view direction is degenerate")]
    DegenerateView,
    /// The sweep touched no focusable agents.
    #[error("no focusable agents in range")]
    NoCandidates,
}

/// Ordered, duplicate-free list of focus candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    agents: Vec<AgentId>,
}

impl CandidateSet {
    /// Builds a set from agents, keeping the first occurrence of each.
    pub fn from_agents(agents: impl IntoIterator<Item = AgentId>) -> Self {
        let mut seen = HashSet::new();
        Self {
            agents: agents
                .into_iter()
                .filter(|agent| seen.insert(*agent))
                .collect(),
        }
    }

    /// Builds a set from sweep hits, discarding non-agents and duplicates.
    pub fn from_hits(
        hits: impl IntoIterator<Item = SweepHit>,
        viewer: Vec3,
        order: CandidateOrder,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut unique: Vec<SweepHit> = hits
            .into_iter()
            .filter(is_focusable)
            .filter(|hit| seen.insert(hit.agent))
            .collect();

        if order == CandidateOrder::Nearest {
            // Stable: equidistant agents keep the order the query reported.
            unique.sort_by_key(|hit| OrderedFloat(hit.position.distance_squared(viewer)));
        }

        Self {
            agents: unique.into_iter().map(|hit| hit.agent).collect(),
        }
    }

    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns `true` when there are no candidates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Candidate at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<AgentId> {
        self.agents.get(index).copied()
    }

    /// Returns `true` when `agent` is a candidate.
    #[must_use]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.agents.contains(&agent)
    }

    /// Index of the last candidate.
    #[must_use]
    pub const fn last_index(&self) -> Option<usize> {
        self.agents.len().checked_sub(1)
    }

    /// Candidates in order.
    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().copied()
    }

    /// Candidates as a slice.
    #[must_use]
    pub const fn as_slice(&self) -> &[AgentId] {
        self.agents.as_slice()
    }
}

/// Runs `sweep` against `query` and collects the focusable agents.
///
/// # Errors
///
/// Returns [`AcquisitionError::NoCandidates`] when no agent was touched.
pub fn collect_candidates<Q: SpatialQuery + ?Sized>(
    query: &Q,
    sweep: &BoxSweep,
    order: CandidateOrder,
) -> Result<CandidateSet, AcquisitionError> {
    let hits = query.sweep_box(sweep);
    for hit in hits.iter().filter(|hit| is_focusable(hit)) {
        debug!("sweep hit agent {:?} at {:?}", hit.agent, hit.position);
    }

    let candidates = CandidateSet::from_hits(hits, sweep.origin, order);
    if candidates.is_empty() {
        return Err(AcquisitionError::NoCandidates);
    }
    Ok(candidates)
}

/// Finds focus candidates ahead of `view`.
///
/// `ignore` is the viewer's own body. The first candidate is the nearest
/// one under [`CandidateOrder::Nearest`].
///
/// # Errors
///
/// Fails with [`AcquisitionError::NoViewPoint`] when `view` is `None`
/// (no query is issued), [`AcquisitionError::DegenerateView`] for an
/// unusable direction, and [`AcquisitionError::NoCandidates`] when nothing
/// focusable was found.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use soulslike::settings::FocusSettings;
/// use soulslike::sweep::{Body, BodySet};
/// use soulslike::targeting::{acquire_candidates, AgentId, CollisionCategory, ViewPoint};
///
/// let mut bodies = BodySet::default();
/// bodies.insert(Body::agent(AgentId(7), Vec3::new(0.0, 0.0, -1500.0), Vec3::splat(40.0)));
/// let view = ViewPoint { position: Vec3::ZERO, forward: Vec3::NEG_Z };
///
/// let found = acquire_candidates(&bodies, Some(view), &FocusSettings::default(), None).unwrap();
/// assert_eq!(found.get(0), Some(AgentId(7)));
/// ```
pub fn acquire_candidates<Q: SpatialQuery + ?Sized>(
    query: &Q,
    view: Option<ViewPoint>,
    settings: &FocusSettings,
    ignore: Option<AgentId>,
) -> Result<CandidateSet, AcquisitionError> {
    let view_point = view.ok_or(AcquisitionError::NoViewPoint)?;
    let sweep = BoxSweep::from_view(&view_point, settings, ignore)?;
    collect_candidates(query, &sweep, settings.candidate_order)
}
