#![cfg(feature = "test-support")]
//! Shared fixture for focus behavioural tests.
//!
//! The rspec-based focus tests tick a Bevy `App` and need to share it
//! safely across rspec closures while reading the focus resource and the
//! player's aim between ticks.

use std::sync::MutexGuard;

use bevy::prelude::*;
use soulslike::focus::FocusState;
use soulslike::rotation::ViewRotation;
use soulslike::settings::GameSettings;
use soulslike::targeting::AgentId;
use soulslike::test_support::{headless_app, spawn_agent, spawn_camera, spawn_player};
use soulslike::{
    ControlRotation, CycleFocusTarget, Focus, LookInput, PlayerCharacter, ToggleFocus,
};

use crate::thread_safe_app::{lock_app, share, SharedApp, ThreadSafeApp};

/// Base fixture owning a `ThreadSafeApp` with a player, a camera and the
/// agents passed to [`FocusFixtureBase::new`].
#[derive(Debug, Clone)]
pub struct FocusFixtureBase {
    app: SharedApp,
    agents: Vec<Entity>,
}

impl FocusFixtureBase {
    /// Builds the headless app and spawns the scene.
    #[must_use]
    pub fn new(settings: &GameSettings, positions: &[Vec3]) -> Self {
        let mut app = headless_app(settings);
        spawn_player(&mut app, Vec3::ZERO);
        spawn_camera(&mut app, Vec3::new(0.0, 60.0, 400.0), Vec3::NEG_Z);
        let agents = positions
            .iter()
            .map(|position| spawn_agent(&mut app, *position))
            .collect();
        Self {
            app: share(app),
            agents,
        }
    }

    /// Locks the underlying `App` for direct inspection or mutation.
    pub fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    /// Advances the application by `frames` ticks.
    pub fn tick(&self, frames: usize) {
        let mut app = self.app_guard();
        for _ in 0..frames {
            app.update();
        }
    }

    /// Drops focus, recentres the aim and ticks once so each scenario
    /// starts from the same pose.
    pub fn reset(&self) {
        {
            let mut app = self.app_guard();
            app.world_mut().resource_mut::<Focus>().disengage();
        }
        self.set_aim(ViewRotation::IDENTITY);
        self.tick(1);
    }

    /// Presses the focus toggle.
    pub fn toggle(&self) {
        let mut app = self.app_guard();
        app.world_mut().trigger(ToggleFocus);
    }

    /// Scrolls the target selection by `scroll`.
    pub fn scroll(&self, scroll: f32) {
        let mut app = self.app_guard();
        app.world_mut().trigger(CycleFocusTarget { scroll });
    }

    /// Sends free-look input.
    pub fn look(&self, delta: Vec2) {
        let mut app = self.app_guard();
        app.world_mut().trigger(LookInput { delta });
    }

    /// Entity of the `index`th spawned agent.
    ///
    /// # Panics
    ///
    /// Panics if fewer agents were spawned.
    #[must_use]
    pub fn agent(&self, index: usize) -> Entity {
        *self
            .agents
            .get(index)
            .unwrap_or_else(|| panic!("no agent at index {index}"))
    }

    /// Current focus state.
    #[must_use]
    pub fn state(&self) -> FocusState {
        self.app_guard().world().resource::<Focus>().state()
    }

    /// Active focus target, if any.
    #[must_use]
    pub fn active_target(&self) -> Option<AgentId> {
        self.app_guard().world().resource::<Focus>().active_target()
    }

    /// Number of candidates held by the controller.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.app_guard().world().resource::<Focus>().candidates().len()
    }

    /// The player's aim rotation.
    ///
    /// # Panics
    ///
    /// Panics if there is not exactly one player.
    #[must_use]
    pub fn aim(&self) -> ViewRotation {
        let mut app = self.app_guard();
        let world = app.world_mut();
        world
            .query_filtered::<&ControlRotation, With<PlayerCharacter>>()
            .single(world)
            .map(|rotation| rotation.0)
            .unwrap_or_else(|e| panic!("player should exist: {e}"))
    }

    /// Overwrites the player's aim rotation.
    pub fn set_aim(&self, rotation: ViewRotation) {
        let mut app = self.app_guard();
        let world = app.world_mut();
        let mut query = world.query_filtered::<&mut ControlRotation, With<PlayerCharacter>>();
        for mut aim in query.iter_mut(world) {
            aim.0 = rotation;
        }
    }
}
