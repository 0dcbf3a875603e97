//! Soft-lock focus controller.
//!
//! [`FocusController`] owns the candidate list and the active selection and
//! runs the `Disengaged`/`Engaged` state machine. While engaged it steers
//! the externally owned aim rotation towards the selected target every
//! frame and drops focus on its own when the target leaves range or the
//! selection goes stale. Every failure is recovered locally; nothing here
//! panics or returns an error to the caller.

use glam::Vec3;
use log::{error, info, warn};

use crate::rotation::ViewRotation;
use crate::settings::FocusSettings;
use crate::targeting::{
    collect_candidates, AcquisitionError, AgentId, BoxSweep, CandidateSet, SpatialQuery,
    ViewPoint,
};

/// Whether the controller is steering the aim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    /// Free look owns the aim.
    #[default]
    Disengaged,
    /// The controller aims at the active candidate.
    Engaged,
}

/// How the character body turns while moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationMode {
    /// Turn towards the direction of travel.
    #[default]
    FaceMovement,
    /// Copy the controller's yaw, strafing around the target.
    FaceControllerYaw,
}

/// Why focus was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisengageReason {
    /// Explicit toggle input.
    Toggled,
    /// The target moved beyond the search radius.
    OutOfRange {
        /// Distance from the character to the target.
        distance: f32,
    },
    /// The target no longer exists in the world.
    TargetLost,
    /// The active index did not point into the candidate list.
    StaleSelection,
    /// Cycling past either end found nothing to re-acquire.
    ReacquireFailed,
}

/// Outcome of an input-driven transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Focus was engaged on `target`.
    Engaged {
        /// The selected candidate.
        target: AgentId,
    },
    /// The active candidate changed while staying engaged.
    Retargeted {
        /// The newly selected candidate.
        target: AgentId,
    },
    /// Focus was dropped.
    Disengaged(DisengageReason),
    /// Engaging was attempted but acquisition failed.
    Refused(AcquisitionError),
    /// The input had no effect in the current state.
    Unchanged,
}

/// Outcome of a per-frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusUpdate {
    /// Not engaged; the aim was not touched.
    Idle,
    /// The aim was steered towards `target`.
    Tracking {
        /// The active candidate.
        target: AgentId,
        /// World position of the target, for indicator projection.
        target_position: Vec3,
        /// Aim rotation after this frame's smoothing.
        rotation: ViewRotation,
    },
    /// Still engaged, but there was no view to aim from this frame.
    NoViewPoint,
    /// Focus was dropped this frame; the aim was not touched.
    Released(DisengageReason),
}

/// World capabilities the controller needs beyond the spatial query.
pub trait FocusWorld: SpatialQuery {
    /// Current camera position and facing, if a view exists.
    fn view_point(&self) -> Option<ViewPoint>;

    /// World position of `agent`, or `None` once it has left the world.
    fn agent_position(&self, agent: AgentId) -> Option<Vec3>;
}

/// Focus state machine and camera assist.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    settings: FocusSettings,
    state: FocusState,
    candidates: CandidateSet,
    active: Option<usize>,
    last_sweep: Option<BoxSweep>,
    acquisitions: u64,
}

impl FocusController {
    /// Creates a disengaged controller.
    #[must_use]
    pub fn new(settings: FocusSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Current tuning.
    #[must_use]
    pub const fn settings(&self) -> &FocusSettings {
        &self.settings
    }

    /// Replaces the tuning; takes effect on the next acquisition or frame.
    pub const fn set_settings(&mut self, settings: FocusSettings) {
        self.settings = settings;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FocusState {
        self.state
    }

    /// Returns `true` while engaged.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        matches!(self.state, FocusState::Engaged)
    }

    /// Candidates from the latest acquisition.
    #[must_use]
    pub const fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Index of the active candidate.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active candidate while engaged.
    #[must_use]
    pub fn active_target(&self) -> Option<AgentId> {
        if !self.is_engaged() {
            return None;
        }
        self.active.and_then(|index| self.candidates.get(index))
    }

    /// Body orientation policy for the current state.
    #[must_use]
    pub const fn orientation_mode(&self) -> OrientationMode {
        match self.state {
            FocusState::Disengaged => OrientationMode::FaceMovement,
            FocusState::Engaged => OrientationMode::FaceControllerYaw,
        }
    }

    /// Free-look input is ignored while engaged.
    #[must_use]
    pub const fn accepts_look_input(&self) -> bool {
        !self.is_engaged()
    }

    /// Most recent acquisition sweep, for debug drawing.
    #[must_use]
    pub const fn last_sweep(&self) -> Option<&BoxSweep> {
        self.last_sweep.as_ref()
    }

    /// Number of sweeps issued so far. Changes whenever
    /// [`Self::last_sweep`] is replaced, even by an identical sweep.
    #[must_use]
    pub const fn acquisition_count(&self) -> u64 {
        self.acquisitions
    }

    /// Engages when disengaged and disengages when engaged.
    ///
    /// `viewer` is the character's own body, excluded from acquisition.
    pub fn toggle<W: FocusWorld + ?Sized>(
        &mut self,
        world: &W,
        viewer: Option<AgentId>,
    ) -> Transition {
        match self.state {
            FocusState::Engaged => self.disengage(),
            FocusState::Disengaged => self.engage(world, viewer),
        }
    }

    /// Acquires candidates and engages on the first one.
    ///
    /// Re-engaging while already engaged refreshes the candidates and
    /// resets the selection.
    pub fn engage<W: FocusWorld + ?Sized>(
        &mut self,
        world: &W,
        viewer: Option<AgentId>,
    ) -> Transition {
        if let Err(err) = self.acquire(world, viewer) {
            info!("focus not engaged: {err}");
            if self.is_engaged() {
                self.release(DisengageReason::ReacquireFailed);
            }
            return Transition::Refused(err);
        }

        self.active = Some(0);
        self.state = FocusState::Engaged;
        match self.candidates.get(0) {
            Some(target) => {
                info!("now focusing on {target:?} ({} candidates)", self.candidates.len());
                Transition::Engaged { target }
            }
            None => Transition::Disengaged(self.release(DisengageReason::StaleSelection)),
        }
    }

    /// Drops focus on explicit request. A no-op when already disengaged.
    pub fn disengage(&mut self) -> Transition {
        if self.is_engaged() {
            Transition::Disengaged(self.release(DisengageReason::Toggled))
        } else {
            Transition::Unchanged
        }
    }

    /// Moves the selection by `delta` candidates.
    ///
    /// Stepping below the first candidate re-acquires and wraps to the
    /// last; stepping past the last re-acquires and wraps to the first.
    /// Re-acquisition may change the candidate list.
    pub fn cycle<W: FocusWorld + ?Sized>(
        &mut self,
        world: &W,
        viewer: Option<AgentId>,
        delta: i32,
    ) -> Transition {
        if !self.is_engaged() || delta == 0 {
            return Transition::Unchanged;
        }
        let Some(active) = self.active else {
            error!("focus selection is missing while engaged");
            return Transition::Disengaged(self.release(DisengageReason::StaleSelection));
        };

        let step = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        let next = if delta < 0 {
            active.checked_sub(step)
        } else {
            active
                .checked_add(step)
                .filter(|index| *index < self.candidates.len())
        };

        let index = match next {
            Some(stepped) => stepped,
            None => {
                if let Err(err) = self.acquire(world, viewer) {
                    warn!("focus re-acquisition failed: {err}");
                    return Transition::Disengaged(self.release(DisengageReason::ReacquireFailed));
                }
                if delta < 0 {
                    self.candidates.last_index().unwrap_or(0)
                } else {
                    0
                }
            }
        };

        self.active = Some(index);
        match self.candidates.get(index) {
            Some(target) => Transition::Retargeted { target },
            None => Transition::Disengaged(self.release(DisengageReason::StaleSelection)),
        }
    }

    /// Cycles one candidate in the direction of a scroll input.
    pub fn cycle_by_scroll<W: FocusWorld + ?Sized>(
        &mut self,
        world: &W,
        viewer: Option<AgentId>,
        scroll: f32,
    ) -> Transition {
        self.cycle(world, viewer, scroll_step(scroll))
    }

    /// Per-frame camera assist.
    ///
    /// Validates the selection, drops focus when the target is gone or
    /// farther than `search_radius` from `character_position`, and
    /// otherwise smooths `aim` towards the look-at rotation from the
    /// camera to the target.
    pub fn update<W: FocusWorld + ?Sized>(
        &mut self,
        world: &W,
        character_position: Vec3,
        aim: &mut ViewRotation,
        delta_seconds: f32,
    ) -> FocusUpdate {
        if !self.is_engaged() {
            return FocusUpdate::Idle;
        }

        let Some(target) = self.active.and_then(|index| self.candidates.get(index)) else {
            error!(
                "focus selection {:?} is invalid for {} candidates",
                self.active,
                self.candidates.len()
            );
            return FocusUpdate::Released(self.release(DisengageReason::StaleSelection));
        };

        let Some(target_position) = world.agent_position(target) else {
            warn!("focus target {target:?} left the world");
            return FocusUpdate::Released(self.release(DisengageReason::TargetLost));
        };

        let distance = target_position.distance(character_position);
        if distance > self.settings.search_radius {
            return FocusUpdate::Released(self.release(DisengageReason::OutOfRange { distance }));
        }

        let Some(view) = world.view_point() else {
            warn!("no view point to aim from; skipping focus frame");
            return FocusUpdate::NoViewPoint;
        };

        let aim_point = target_position + Vec3::Y * self.settings.target_height_offset;
        let desired = ViewRotation::look_at(view.position, aim_point);
        *aim = aim.interp_to(desired, delta_seconds, self.settings.interp_speed);

        FocusUpdate::Tracking {
            target,
            target_position,
            rotation: *aim,
        }
    }

    fn acquire<W: FocusWorld + ?Sized>(
        &mut self,
        world: &W,
        viewer: Option<AgentId>,
    ) -> Result<(), AcquisitionError> {
        self.candidates = CandidateSet::default();
        let view = world.view_point().ok_or(AcquisitionError::NoViewPoint)?;
        let sweep = BoxSweep::from_view(&view, &self.settings, viewer)?;
        self.last_sweep = Some(sweep);
        self.acquisitions = self.acquisitions.wrapping_add(1);
        self.candidates = collect_candidates(world, &sweep, self.settings.candidate_order)?;
        Ok(())
    }

    fn release(&mut self, reason: DisengageReason) -> DisengageReason {
        self.state = FocusState::Disengaged;
        self.active = None;
        self.candidates = CandidateSet::default();
        info!("focusing is off: {reason:?}");
        reason
    }
}

/// Converts a scroll delta into a single selection step.
#[must_use]
pub const fn scroll_step(scroll: f32) -> i32 {
    if scroll >= 0.5 {
        1
    } else if scroll <= -0.5 {
        -1
    } else {
        0
    }
}
