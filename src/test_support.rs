//! Headless app helpers shared by integration tests.
//!
//! Only compiled with the `test-support` feature.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::plugin::{focusable_agent, insert_settings, player, FocusCamera, FocusPlugin};
use crate::settings::GameSettings;

/// Fixed frame duration used by [`headless_app`].
pub const FRAME: Duration = Duration::from_millis(16);

/// Half extents used for spawned characters.
pub const CHARACTER_EXTENTS: Vec3 = Vec3::new(40.0, 90.0, 40.0);

/// Builds an app with `MinimalPlugins`, `FocusPlugin` and a fixed clock.
///
/// Plugins are finished so the app can be ticked with [`App::update`].
#[must_use]
pub fn headless_app(settings: &GameSettings) -> App {
    headless_app_with(settings, |_| {})
}

/// Like [`headless_app`], but runs `setup` before plugins are finished so
/// callers can add their own plugins and resources.
#[must_use]
pub fn headless_app_with(settings: &GameSettings, setup: impl FnOnce(&mut App)) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    insert_settings(&mut app, settings);
    app.add_plugins(FocusPlugin);
    setup(&mut app);
    app.finish();
    app.cleanup();
    app
}

/// Spawns the player at `position`.
pub fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn(player(position, CHARACTER_EXTENTS))
        .id()
}

/// Spawns the focus camera at `position` looking along `forward`.
pub fn spawn_camera(app: &mut App, position: Vec3, forward: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            FocusCamera,
            Transform::from_translation(position).looking_to(forward, Vec3::Y),
        ))
        .id()
}

/// Spawns a focusable agent at `position`.
pub fn spawn_agent(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn(focusable_agent(position, CHARACTER_EXTENTS))
        .id()
}

/// Runs `frames` updates.
pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}
