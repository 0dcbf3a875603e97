//! Utility helpers for tests.
//!
//! [`ArenaWorld`] is an in-memory [`FocusWorld`] with a movable camera and
//! agents laid out by hand, used to drive the focus controller without Bevy.

use glam::Vec3;
use soulslike::focus::FocusWorld;
use soulslike::sweep::{Body, BodySet};
use soulslike::targeting::{AgentId, BoxSweep, SpatialQuery, SweepHit, ViewPoint};

/// Half extents used for characters placed with [`ArenaWorld::with_agent`].
pub const AGENT_EXTENTS: Vec3 = Vec3::new(40.0, 90.0, 40.0);

/// Hand-built world for focus tests.
#[derive(Debug, Clone, Default)]
pub struct ArenaWorld {
    bodies: BodySet,
    view: Option<ViewPoint>,
}

impl ArenaWorld {
    /// Empty arena with a camera at `position` looking along `forward`.
    #[must_use]
    pub fn looking(position: Vec3, forward: Vec3) -> Self {
        Self {
            bodies: BodySet::default(),
            view: Some(ViewPoint { position, forward }),
        }
    }

    /// Empty arena with no camera.
    #[must_use]
    pub fn blind() -> Self {
        Self::default()
    }

    /// Adds an agent with `id` at `position`.
    #[must_use]
    pub fn with_agent(mut self, id: u64, position: Vec3) -> Self {
        self.bodies
            .insert(Body::agent(AgentId(id), position, AGENT_EXTENTS));
        self
    }

    /// Adds a static body that sweeps for agents must ignore.
    #[must_use]
    pub fn with_wall(mut self, id: u64, position: Vec3, half_extents: Vec3) -> Self {
        self.bodies
            .insert(Body::world_static(AgentId(id), position, half_extents));
        self
    }

    /// Moves agent `id` to `position`.
    ///
    /// # Panics
    /// Panics if the agent does not exist.
    pub fn move_agent(&mut self, id: u64, position: Vec3) {
        let mut body = self
            .bodies
            .remove(AgentId(id))
            .unwrap_or_else(|| panic!("agent {id} is not in the arena"));
        body.center = position;
        self.bodies.insert(body);
    }

    /// Removes agent `id` from the arena.
    pub fn remove_agent(&mut self, id: u64) {
        self.bodies.remove(AgentId(id));
    }

    /// Replaces the camera, or removes it with `None`.
    pub fn set_view(&mut self, view: Option<ViewPoint>) {
        self.view = view;
    }
}

impl SpatialQuery for ArenaWorld {
    fn sweep_box(&self, sweep: &BoxSweep) -> Vec<SweepHit> {
        self.bodies.sweep_box(sweep)
    }
}

impl FocusWorld for ArenaWorld {
    fn view_point(&self) -> Option<ViewPoint> {
        self.view
    }

    fn agent_position(&self, agent: AgentId) -> Option<Vec3> {
        self.bodies.get(agent).map(|body| body.center)
    }
}

/// Asserts that two vectors are within `epsilon` of each other.
///
/// # Panics
/// Panics with both values when they differ by more than `epsilon`.
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, epsilon: f32) {
    assert!(
        (actual - expected).length() <= epsilon,
        "expected {expected:?}, got {actual:?}"
    );
}
